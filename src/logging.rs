use tracing::level_filters::LevelFilter;
use tracing_subscriber::{Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Handle used to change the active severity once the configuration is loaded.
pub type LogHandle = reload::Handle<LevelFilter, Registry>;

const SEVERITY_NAMES: &[(&str, LevelFilter)] = &[
    ("TRACE", LevelFilter::TRACE),
    ("DEBUG", LevelFilter::DEBUG),
    ("INFO", LevelFilter::INFO),
    ("WARN", LevelFilter::WARN),
    ("WARNING", LevelFilter::WARN),
    ("ERROR", LevelFilter::ERROR),
    ("FATAL", LevelFilter::ERROR),
];

/// Resolves a severity name, ignoring ASCII case.
#[must_use]
pub fn severity_from_name(name: &str) -> Option<LevelFilter> {
    SEVERITY_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, level)| *level)
}

/// Installs the global subscriber, writing to stderr at `initial` until [`set_level`] is called.
pub fn init(initial: LevelFilter) -> LogHandle {
    let (filter, handle) = reload::Layer::new(initial);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

pub fn set_level(handle: &LogHandle, level: LevelFilter) -> Result<(), reload::Error> {
    handle.reload(level)
}
