//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate. Output goes to stderr so it never interleaves with the terminal
//! dashboard on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber
///
/// `extra_directives` is appended to the configured level, e.g.
/// `"tower_http=debug"` for the hub.
pub fn init(config: &LoggingConfig, extra_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config, extra_directives)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// Filter directives for a config, without consulting the environment
pub fn filter_directives(config: &LoggingConfig, extra_directives: &str) -> String {
    let mut directives = format!("tiltwatch={}", config.level);
    if !extra_directives.is_empty() {
        directives.push(',');
        directives.push_str(extra_directives);
    }
    directives
}
