//! Logger setup for binaries and examples.
//!
//! The library only emits `log` records; nothing is printed unless the
//! embedding program installs a logger, for instance with [`init_logging`].

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax (`"info"`,
/// `"vecrender=trace"`). When unset, `RUST_LOG` is consulted, then `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Filter derived from a `-v` count: 0 keeps the default, 1 is debug,
    /// 2 and above is trace.
    pub fn from_verbosity(verbose: u8) -> Self {
        let env_filter = match verbose {
            0 => None,
            1 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        };
        Self {
            env_filter,
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
