pub mod config;
pub mod error;
pub mod utils;

pub use config::{GlobalConfig, RenderConfig};
pub use error::{Result, SortplotError, SortplotErrorKind};
