//! Director log levels and host log sinks

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity levels understood by Director's logging system.
///
/// Codes are widely spaced so the host can slot its own levels in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DirectorLogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Off,
}

impl DirectorLogLevel {
    pub const ALL: [DirectorLogLevel; 6] = [
        DirectorLogLevel::Debug,
        DirectorLogLevel::Info,
        DirectorLogLevel::Warn,
        DirectorLogLevel::Error,
        DirectorLogLevel::Fatal,
        DirectorLogLevel::Off,
    ];

    /// Integer code passed to the host's log sink.
    pub fn code(self) -> i32 {
        match self {
            DirectorLogLevel::Debug => 30_000,
            DirectorLogLevel::Info => 40_000,
            DirectorLogLevel::Warn => 60_000,
            DirectorLogLevel::Error => 70_000,
            DirectorLogLevel::Fatal => 110_000,
            DirectorLogLevel::Off => i32::MAX,
        }
    }

    /// Map an exact code back to its level.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectorLogLevel::Debug => "DEBUG",
            DirectorLogLevel::Info => "INFO",
            DirectorLogLevel::Warn => "WARN",
            DirectorLogLevel::Error => "ERROR",
            DirectorLogLevel::Fatal => "FATAL",
            DirectorLogLevel::Off => "OFF",
        }
    }
}

impl fmt::Display for DirectorLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host callback receiving `(logger, level_code, message)`.
pub type LogSink = dyn Fn(&str, i32, &str);

/// A sink that re-emits Director log requests as `tracing` events.
///
/// Hosts without a logging system of their own can subscribe this to see
/// plugin logs alongside the crate's diagnostics. Codes that do not map to a
/// known level are reported at `warn` with the raw code attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl TracingLogSink {
    pub fn emit(&self, logger: &str, level_code: i32, message: &str) {
        match DirectorLogLevel::from_code(level_code) {
            Some(DirectorLogLevel::Debug) => tracing::debug!(logger = %logger, "{}", message),
            Some(DirectorLogLevel::Info) => tracing::info!(logger = %logger, "{}", message),
            Some(DirectorLogLevel::Warn) => tracing::warn!(logger = %logger, "{}", message),
            Some(DirectorLogLevel::Error | DirectorLogLevel::Fatal) => {
                tracing::error!(logger = %logger, "{}", message)
            }
            Some(DirectorLogLevel::Off) => {}
            None => tracing::warn!(logger = %logger, level_code, "{}", message),
        }
    }

    /// Closure form ready for [`PluginAdapter::subscribe_log`](crate::PluginAdapter::subscribe_log).
    pub fn into_sink(self) -> impl Fn(&str, i32, &str) + 'static {
        move |logger, level_code, message| self.emit(logger, level_code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_director() {
        assert_eq!(DirectorLogLevel::Debug.code(), 30000);
        assert_eq!(DirectorLogLevel::Info.code(), 40000);
        assert_eq!(DirectorLogLevel::Warn.code(), 60000);
        assert_eq!(DirectorLogLevel::Error.code(), 70000);
        assert_eq!(DirectorLogLevel::Fatal.code(), 110000);
        assert_eq!(DirectorLogLevel::Off.code(), i32::MAX);
    }

    #[test]
    fn test_ordering_follows_codes() {
        for pair in DirectorLogLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].code() < pair[1].code());
        }
    }

    #[test]
    fn test_from_code() {
        for level in DirectorLogLevel::ALL {
            assert_eq!(DirectorLogLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(DirectorLogLevel::from_code(50_000), None);
    }

    #[test]
    fn test_serde_uses_director_names() {
        let json = serde_json::to_string(&DirectorLogLevel::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
    }

    #[test]
    fn test_tracing_sink_accepts_unknown_codes() {
        let sink = TracingLogSink.into_sink();
        sink("Host", 45_000, "between info and warn");
        sink("Host", DirectorLogLevel::Off.code(), "dropped");
    }
}
