//! Utilities: logging setup.
//!
//! Key items:
//!   init_logging / derive_level
//!
//! Logs always go to stderr; stdout belongs to the MCP stdio transport.

/// Logging helpers.
pub mod logging {
    use tracing_subscriber::EnvFilter;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        /// Filter directive; our own crate gets the chosen level, dependencies
        /// stay one notch quieter unless tracing everything.
        pub fn directive(&self) -> &'static str {
            match self {
                LogLevel::Error => "error",
                LogLevel::Info => "warn,sui_mcp=info",
                LogLevel::Debug => "info,sui_mcp=debug",
                LogLevel::Trace => "trace",
            }
        }
    }

    pub fn derive_level(verbose: u8, quiet: bool) -> LogLevel {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Install the global subscriber. `RUST_LOG` wins over the derived level.
    pub fn init_logging(level: LogLevel) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.directive()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn quiet_wins() {
            assert_eq!(derive_level(2, true), LogLevel::Error);
        }

        #[test]
        fn verbosity_steps() {
            assert_eq!(derive_level(0, false), LogLevel::Info);
            assert_eq!(derive_level(1, false), LogLevel::Debug);
            assert_eq!(derive_level(5, false), LogLevel::Trace);
        }

        #[test]
        fn directives_parse() {
            for level in [
                LogLevel::Error,
                LogLevel::Info,
                LogLevel::Debug,
                LogLevel::Trace,
            ] {
                assert!(EnvFilter::try_new(level.directive()).is_ok());
            }
        }
    }
}

pub use logging::{derive_level, init_logging};
