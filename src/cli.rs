use clap::{Arg, ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, value_parser};
use std::{ffi::OsString, path::PathBuf};

use crate::{
    config::Config,
    error::ConfigError,
    identity::AccountLookup,
    loader::load_config_with,
    options::ConfigOption,
};

/// Command-line surface: a few switches of its own plus one `--<option> <VALUE>`
/// argument per registry option.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "proxy-config", about, version, long_about = None)]
pub struct Arguments {
    #[arg(long = "conf", value_name = "PATH", help = ConfigOption::Conf.help())]
    pub conf: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long = "verify-client", help = "Require a client certificate")]
    pub verify_client: bool,

    #[arg(long = "print-config", help = "Print the effective configuration as TOML")]
    pub print_config: bool,

    /// Registry options in the order they appeared on the command line.
    #[arg(skip)]
    pub options: Vec<(ConfigOption, String)>,
}

impl Arguments {
    #[must_use]
    pub fn command() -> clap::Command {
        ConfigOption::ALL
            .into_iter()
            .filter(|option| *option != ConfigOption::Conf)
            .fold(<Self as CommandFactory>::command(), |command, option| {
                command.arg(
                    Arg::new(option.name())
                        .long(option.name())
                        .value_name("VALUE")
                        .help(option.help())
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(String)),
                )
            })
    }

    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut arguments = <Self as FromArgMatches>::from_arg_matches(&matches)?;
        arguments.options = ordered_options(&matches);
        Ok(arguments)
    }
}

fn ordered_options(matches: &ArgMatches) -> Vec<(ConfigOption, String)> {
    let mut indexed: Vec<(usize, ConfigOption, String)> = Vec::new();

    for option in ConfigOption::ALL {
        if option == ConfigOption::Conf {
            continue;
        }
        let (Some(indices), Some(values)) = (
            matches.indices_of(option.name()),
            matches.get_many::<String>(option.name()),
        ) else {
            continue;
        };
        indexed.extend(
            indices
                .zip(values)
                .map(|(index, value)| (index, option, value.clone())),
        );
    }

    indexed.sort_by_key(|(index, ..)| *index);
    indexed
        .into_iter()
        .map(|(_, option, value)| (option, value))
        .collect()
}

/// Builds the configuration from the file named by `--conf`, if any, then the
/// command-line options in order.
pub fn resolve_config(
    arguments: &Arguments,
    accounts: &dyn AccountLookup,
) -> Result<Config, ConfigError> {
    let mut config = Config::new();
    config.verbose = arguments.verbose;
    config.verify_client = arguments.verify_client;

    if let Some(path) = &arguments.conf {
        config.conf_path = Some(path.display().to_string());
        load_config_with(&mut config, path, accounts)?;
    }

    for (option, value) in &arguments.options {
        option.apply(&mut config, value, accounts)?;
    }

    Ok(config)
}
