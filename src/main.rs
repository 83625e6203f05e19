use anyhow::{Context, Result};
use proxy_config::{
    Arguments, Config, LogHandle, SharedConfig, SystemAccounts, logging, resolve_config,
};
use std::process::ExitCode;
use tracing::{error, info, level_filters::LevelFilter};

fn main() -> ExitCode {
    let log_handle = logging::init(LevelFilter::INFO);

    match run(&log_handle) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(log_handle: &LogHandle) -> Result<SharedConfig> {
    let arguments = match Arguments::try_parse_args(std::env::args_os()) {
        Ok(arguments) => arguments,
        Err(e) => e.exit(),
    };

    let config = resolve_config(&arguments, &SystemAccounts).context("Failed to load configuration")?;

    let level = if config.verbose {
        LevelFilter::DEBUG.max(config.log_level)
    } else {
        config.log_level
    };
    logging::set_level(log_handle, level).context("Failed to apply log level")?;

    info!(
        config_file = config.conf_path.as_deref().unwrap_or("none"),
        frontend_host = config.frontend_host.as_deref().unwrap_or(""),
        frontend_port = config.frontend_port,
        backend = config.backend_hostport().as_deref().unwrap_or(""),
        workers = config.workers,
        log_level = %level,
        "Configuration loaded"
    );

    if arguments.print_config {
        print_config(&config)?;
    }

    Ok(config.share())
}

fn print_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration as TOML")?;
    print!("{rendered}");
    Ok(())
}
