//! The closed set of recognized options and the rule each one applies to a [`Config`].
//!
//! Options arrive as raw `(name, value)` string pairs, either from the config file or
//! from the command line. Names are matched without regard to ASCII case. A rejected
//! value leaves the configuration untouched.

use std::{collections::HashMap, str::FromStr, sync::LazyLock, time::Duration};
use tracing::{debug, info};

use crate::{
    config::{Config, set_config_str},
    error::ConfigError,
    hostport::{MAX_HOSTNAME_LEN, split_host_port},
    identity::{AccountLookup, SystemAccounts},
    logging::severity_from_name,
};

/// Largest accepted `frontend-spdy-window-bits` value.
pub const MAX_WINDOW_BITS: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigOption {
    PrivateKeyFile,
    CertificateFile,
    Backend,
    Frontend,
    Workers,
    SpdyMaxConcurrentStreams,
    LogLevel,
    Daemon,
    SpdyProxy,
    AddXForwardedFor,
    FrontendSpdyReadTimeout,
    FrontendReadTimeout,
    FrontendWriteTimeout,
    BackendReadTimeout,
    BackendWriteTimeout,
    Accesslog,
    BackendKeepAliveTimeout,
    FrontendSpdyWindowBits,
    PidFile,
    User,
    Conf,
}

/// Canonical name and help text, in declaration order of [`ConfigOption`].
const NAMES_AND_HELP: [(&str, &str); 21] = [
    ("private-key-file", "Path to the private key file"),
    ("certificate-file", "Path to the certificate file"),
    ("backend", "Backend address as <HOST>,<PORT>"),
    ("frontend", "Frontend address to listen on as <HOST>,<PORT>"),
    ("workers", "Number of worker threads"),
    ("spdy-max-concurrent-streams", "Maximum concurrent streams per frontend session"),
    ("log-level", "Severity level: TRACE, DEBUG, INFO, WARN, ERROR or FATAL"),
    ("daemon", "Run in the background (yes/no)"),
    ("spdy-proxy", "Act as a forward proxy (yes/no)"),
    ("add-x-forwarded-for", "Append the X-Forwarded-For header (yes/no)"),
    ("frontend-spdy-read-timeout", "Read timeout for frontend sessions, in seconds"),
    ("frontend-read-timeout", "Read timeout for frontend connections, in seconds"),
    ("frontend-write-timeout", "Write timeout for frontend connections, in seconds"),
    ("backend-read-timeout", "Read timeout for backend connections, in seconds"),
    ("backend-write-timeout", "Write timeout for backend connections, in seconds"),
    ("accesslog", "Write the access log (yes/no)"),
    ("backend-keep-alive-timeout", "Idle timeout for pooled backend connections, in seconds"),
    ("frontend-spdy-window-bits", "Frontend flow-control window as a power of two, 0 to 30"),
    ("pid-file", "Path to write the process id to"),
    ("user", "Account to drop privileges to"),
    ("conf", "Load options from this configuration file"),
];

static REGISTRY: LazyLock<HashMap<&'static str, ConfigOption>> = LazyLock::new(|| {
    ConfigOption::ALL
        .iter()
        .map(|option| (option.name(), *option))
        .collect()
});

/// Finds the option called `name`, ignoring ASCII case.
#[must_use]
pub fn lookup(name: &str) -> Option<ConfigOption> {
    REGISTRY.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Applies one `name=value` assignment, resolving `user` against the system account database.
pub fn parse_config(config: &mut Config, name: &str, value: &str) -> Result<(), ConfigError> {
    parse_config_with(config, name, value, &SystemAccounts)
}

pub fn parse_config_with(
    config: &mut Config,
    name: &str,
    value: &str,
    accounts: &dyn AccountLookup,
) -> Result<(), ConfigError> {
    let option = lookup(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
    option.apply(config, value, accounts)
}

impl ConfigOption {
    pub const ALL: [Self; 21] = [
        Self::PrivateKeyFile,
        Self::CertificateFile,
        Self::Backend,
        Self::Frontend,
        Self::Workers,
        Self::SpdyMaxConcurrentStreams,
        Self::LogLevel,
        Self::Daemon,
        Self::SpdyProxy,
        Self::AddXForwardedFor,
        Self::FrontendSpdyReadTimeout,
        Self::FrontendReadTimeout,
        Self::FrontendWriteTimeout,
        Self::BackendReadTimeout,
        Self::BackendWriteTimeout,
        Self::Accesslog,
        Self::BackendKeepAliveTimeout,
        Self::FrontendSpdyWindowBits,
        Self::PidFile,
        Self::User,
        Self::Conf,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        NAMES_AND_HELP[self as usize].0
    }

    #[must_use]
    pub const fn help(self) -> &'static str {
        NAMES_AND_HELP[self as usize].1
    }

    /// Validates `value` and stores it in the field this option controls.
    pub fn apply(
        self,
        config: &mut Config,
        value: &str,
        accounts: &dyn AccountLookup,
    ) -> Result<(), ConfigError> {
        match self {
            Self::Backend => {
                let parsed = split_host_port(value, MAX_HOSTNAME_LEN)?;
                set_config_str(&mut config.backend_host, &parsed.host);
                config.backend_port = parsed.port;
            }
            Self::Frontend => {
                let parsed = split_host_port(value, MAX_HOSTNAME_LEN)?;
                set_config_str(&mut config.frontend_host, &parsed.host);
                config.frontend_port = parsed.port;
            }
            Self::Workers => config.workers = self.parse_number(value)?,
            Self::SpdyMaxConcurrentStreams => {
                config.max_concurrent_streams = self.parse_number(value)?;
            }
            Self::LogLevel => {
                config.log_level = severity_from_name(value)
                    .ok_or_else(|| ConfigError::InvalidLogLevel(value.to_string()))?;
            }
            Self::Daemon => config.daemon = parse_yes(value),
            Self::SpdyProxy => config.spdy_proxy = parse_yes(value),
            Self::AddXForwardedFor => config.add_x_forwarded_for = parse_yes(value),
            Self::Accesslog => config.accesslog = parse_yes(value),
            Self::FrontendSpdyReadTimeout => {
                config.timeouts.frontend_spdy_read = self.parse_secs(value)?;
            }
            Self::FrontendReadTimeout => config.timeouts.frontend_read = self.parse_secs(value)?,
            Self::FrontendWriteTimeout => config.timeouts.frontend_write = self.parse_secs(value)?,
            Self::BackendReadTimeout => config.timeouts.backend_read = self.parse_secs(value)?,
            Self::BackendWriteTimeout => config.timeouts.backend_write = self.parse_secs(value)?,
            Self::BackendKeepAliveTimeout => {
                config.timeouts.backend_keep_alive = self.parse_secs(value)?;
            }
            Self::FrontendSpdyWindowBits => {
                let bits: u64 = self.parse_number(value)?;
                config.window_bits = u8::try_from(bits)
                    .ok()
                    .filter(|bits| *bits <= MAX_WINDOW_BITS)
                    .ok_or(ConfigError::OutOfRange {
                        option: self.name(),
                        max: u64::from(MAX_WINDOW_BITS),
                    })?;
            }
            Self::PidFile => set_config_str(&mut config.pid_file, value),
            Self::PrivateKeyFile => set_config_str(&mut config.private_key_file, value),
            Self::CertificateFile => set_config_str(&mut config.cert_file, value),
            Self::User => {
                let account = accounts
                    .lookup(value)
                    .map_err(|source| ConfigError::UnknownUser {
                        name: value.to_string(),
                        source,
                    })?;
                config.uid = account.uid;
                config.gid = account.gid;
            }
            Self::Conf => {
                info!("conf is ignored");
                return Ok(());
            }
        }

        debug!(option = self.name(), value, "Option applied");
        Ok(())
    }

    fn parse_number<T: FromStr>(self, value: &str) -> Result<T, ConfigError> {
        value.parse().map_err(|_| ConfigError::InvalidNumber {
            option: self.name(),
            value: value.to_string(),
        })
    }

    fn parse_secs(self, value: &str) -> Result<Duration, ConfigError> {
        self.parse_number(value).map(Duration::from_secs)
    }
}

/// Only `yes` switches a flag on; any other value, including a typo, switches it off.
fn parse_yes(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes")
}
