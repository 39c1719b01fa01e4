pub mod core;
pub mod visualize;

pub use crate::core::error::{Result, SortplotError, SortplotErrorKind};
pub use crate::core::{GlobalConfig, RenderConfig};
pub use visualize::VisualizeConfig;
