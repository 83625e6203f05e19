use serde::{Serialize, Serializer};
use std::{sync::Arc, time::Duration};
use tracing::level_filters::LevelFilter;

/// Read-only handle to the resolved configuration, shared by every subsystem after startup.
pub type SharedConfig = Arc<Config>;

/// The resolved settings of one proxy process.
///
/// Built once at startup with [`Config::new`], filled in by the option registry and
/// the file loader through `&mut Config`, then frozen with [`Config::share`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub private_key_file: Option<String>,
    pub cert_file: Option<String>,
    pub pid_file: Option<String>,
    pub conf_path: Option<String>,

    pub frontend_host: Option<String>,
    pub frontend_port: u16,

    pub backend_host: Option<String>,
    pub backend_port: u16,
    /// Filled in by the network layer once the backend address is resolved.
    pub backend_addrlen: usize,

    pub workers: usize,
    pub max_concurrent_streams: u32,
    /// Flow-control window size as a power of two, in `[0, 30]`.
    pub window_bits: u8,

    pub verbose: bool,
    pub daemon: bool,
    pub verify_client: bool,
    pub spdy_proxy: bool,
    pub add_x_forwarded_for: bool,
    pub accesslog: bool,

    pub uid: u32,
    pub gid: u32,

    #[serde(serialize_with = "serialize_level")]
    pub log_level: LevelFilter,

    pub timeouts: Timeouts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Timeouts {
    #[serde(serialize_with = "serialize_secs")]
    pub frontend_spdy_read: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub frontend_read: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub frontend_write: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub backend_read: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub backend_write: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub backend_keep_alive: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            private_key_file: None,
            cert_file: None,
            pid_file: None,
            conf_path: None,
            frontend_host: None,
            frontend_port: 0,
            backend_host: None,
            backend_port: 0,
            backend_addrlen: 0,
            workers: 0,
            max_concurrent_streams: 0,
            window_bits: 0,
            verbose: false,
            daemon: false,
            verify_client: false,
            spdy_proxy: false,
            add_x_forwarded_for: false,
            accesslog: false,
            uid: 0,
            gid: 0,
            log_level: LevelFilter::INFO,
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Freezes the configuration for sharing with the subsystems started after it.
    #[must_use]
    pub fn share(self) -> SharedConfig {
        Arc::new(self)
    }

    /// `host:port` of the backend, or `None` until a backend has been configured.
    #[must_use]
    pub fn backend_hostport(&self) -> Option<String> {
        let host = self.backend_host.as_deref()?;
        if host.contains(':') {
            Some(format!("[{host}]:{}", self.backend_port))
        } else {
            Some(format!("{host}:{}", self.backend_port))
        }
    }
}

/// Replaces an owned string field with a copy of `value`, dropping whatever it held.
pub fn set_config_str(dest: &mut Option<String>, value: &str) {
    *dest = Some(value.to_owned());
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_secs())
}

fn serialize_level<S: Serializer>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(level)
}
