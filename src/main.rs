// SPDX-License-Identifier: MPL-2.0
//! Command-line entry point for `iced_gallery`.

use iced_gallery::app::{self, paths, Flags};
use iced_gallery::config;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: iced_gallery [OPTIONS] <PAGE>

Arguments:
  <PAGE>              Gallery page to open (file path or http(s) URL)

Options:
  --config-dir <DIR>  Directory holding settings.toml
  --rich              Swap thumbnails to their rich variant on hover
  -h, --help          Print this help";

const DEFAULT_LOG_LEVEL: &str = "info";

fn parse_args() -> Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let config_dir: Option<String> = args.opt_value_from_str("--config-dir")?;
    let rich = args.contains("--rich");
    let page = args
        .finish()
        .into_iter()
        .next()
        .and_then(|s| s.into_string().ok());

    Ok(Some(Flags {
        page,
        rich,
        config_dir,
        ..Flags::default()
    }))
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_LOG_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> iced::Result {
    let mut flags = match parse_args() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    paths::init_cli_overrides(flags.config_dir.clone());

    let (config, warning) = config::load();
    init_tracing(config.general.log_level.as_deref());
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
    flags.config = config;
    tracing::debug!(page = ?flags.page, rich = flags.rich, "starting");

    app::run(flags)
}
