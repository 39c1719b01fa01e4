//! Main binary entrypoint for sortplot.
//!
//! Parses CLI arguments, resolves configuration, sets up logging, and renders
//! the charts.

use clap::Parser;
use sortplot::{
    GlobalConfig, RenderConfig, Result, VisualizeConfig,
    core::config::create_figment,
    visualize::{self, DEFAULT_INPUT},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sortplot", version)]
#[command(about = "Plot sorting benchmark results, one chart per input distribution")]
struct Cli {
    #[arg(default_value = DEFAULT_INPUT, help = "Benchmark results CSV file")]
    input: PathBuf,

    #[arg(long, help = "Directory to write charts to. Defaults to the input file's directory.")]
    output: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long, help = "Config file to use instead of the per-user one")]
    config: Option<PathBuf>,

    #[arg(long, help = "Stop at the first chart that cannot be written")]
    fail_fast: bool,

    #[arg(long)]
    verbose: bool,
}

/// Resolve config file and environment, then let CLI flags take precedence
fn load_settings(cli: &Cli) -> Result<(GlobalConfig, RenderConfig)> {
    let figment = create_figment(cli.config.as_deref())?;

    let mut global_config = GlobalConfig::from_figment(&figment)?;
    let mut render_config = RenderConfig::from_figment(&figment)?;

    if cli.verbose {
        global_config.verbose = true;
    }
    if let Some(output) = &cli.output {
        render_config.output_dir = Some(output.clone());
    }
    if let Some(width) = cli.width {
        render_config.width = width;
    }
    if let Some(height) = cli.height {
        render_config.height = height;
    }
    if cli.fail_fast {
        render_config.fail_fast = true;
    }

    Ok((global_config, render_config))
}

fn main() {
    // Usage errors exit with 1; --help and --version still exit cleanly
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let settings = load_settings(&cli);

    // Toggle the tracing level
    let verbose = cli.verbose || settings.as_ref().is_ok_and(|(global, _)| global.verbose);
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let result = settings.and_then(|(_, render)| {
        visualize::run(&VisualizeConfig {
            input: cli.input,
            render,
        })
    });

    // If anything results in an error, print and exit
    if let Err(e) = result {
        tracing::error!("{e}");

        std::process::exit(1);
    }
}
