//! Log output for the stand-in API.
//!
//! dev-server prints readable multi-line events to stderr. Tests use the
//! compact format through the test writer so output stays attached to the
//! test that produced it.

use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
}

/// Log an error with its full chain.
pub fn log_error(e: impl Into<anyhow::Error>) {
    let e: anyhow::Error = e.into();
    tracing::error!("{e:#}");
}

fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the process-wide subscriber, with `RUST_LOG` taking precedence
/// over `default_filter`. Fails when a subscriber is already installed.
pub fn init(default_filter: &str, format: LogFormat) -> anyhow::Result<()> {
    LogTracer::init()?;
    let registry = Registry::default().with(filter(default_filter));
    match format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            ),
        )?,
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().compact().with_test_writer()),
        )?,
    }
    Ok(())
}

/// Every test spawns an app, so all but the first call find logging set up.
pub fn init_for_tests() {
    if let Err(e) = init("error", LogFormat::Compact) {
        tracing::trace!("log subscriber already installed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_test_setup_is_harmless() {
        init_for_tests();
        init_for_tests();
        assert!(init("info", LogFormat::Pretty).is_err());
    }
}
