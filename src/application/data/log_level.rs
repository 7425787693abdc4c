use clap::ValueEnum;
use tracing::Level;

/// Verbosity of the diagnostics written to standard error. Progress lines on
/// standard output are not affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    /// No subscriber at all.
    Silent,
}

impl LogLevel {
    pub fn max_level(self) -> Option<Level> {
        match self {
            LogLevel::Trace => Some(Level::TRACE),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(LogLevel::Debug, Some(Level::DEBUG))]
    #[case(LogLevel::Warn, Some(Level::WARN))]
    #[case(LogLevel::Silent, None)]
    fn test_max_level(#[case] level: LogLevel, #[case] expected: Option<Level>) {
        assert_eq!(level.max_level(), expected);
    }

    #[test]
    fn test_names_accepted_on_the_command_line() {
        assert_eq!(LogLevel::from_str("info", true), Ok(LogLevel::Info));
        assert_eq!(LogLevel::from_str("silent", true), Ok(LogLevel::Silent));
        assert!(LogLevel::from_str("loud", true).is_err());
    }
}
