use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata};

use crate::device::LOG_TARGET;

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "glint_engine=debug,glint::gl=trace"). When unset, `RUST_LOG` is used,
/// then `Info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Prefix records with a millisecond timestamp.
    pub timestamps: bool,
    /// Keep GL error reports visible when `filter` would silence them.
    pub always_show_gl_errors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
            always_show_gl_errors: true,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").ok();
        let mut builder = builder(&config, env_filter.clone());

        // Another logger may already be installed (e.g. by a host binary).
        if builder.try_init().is_err() {
            log::warn!("a global logger was already set; keeping it");
            return;
        }

        let filter = config.filter.or(env_filter);
        log::debug!("logging initialized (filter: {})", filter.as_deref().unwrap_or("info"));
    });
}

fn builder(config: &LoggingConfig, env_filter: Option<String>) -> env_logger::Builder {
    let filter = config.filter.clone().or(env_filter);
    let mut builder = filtered(filter.as_deref());

    // Only raise the floor: a filter that already shows GL errors (at any
    // verbosity) is left alone.
    if config.always_show_gl_errors && !shows_gl_errors(filter.as_deref()) {
        builder.filter_module(LOG_TARGET, LevelFilter::Error);
    }

    builder.write_style(config.write_style);
    if config.timestamps {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None);
    }
    builder
}

fn filtered(filter: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder
}

fn shows_gl_errors(filter: Option<&str>) -> bool {
    filtered(filter).build().enabled(&gl_metadata(Level::Error))
}

fn gl_metadata(level: Level) -> Metadata<'static> {
    Metadata::builder().target(LOG_TARGET).level(level).build()
}
