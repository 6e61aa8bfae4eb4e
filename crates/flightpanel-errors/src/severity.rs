//! Severity levels used to rank panel errors.

use core::fmt;

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, the next attempt may succeed
    Warning = 1,
    /// The operation failed
    Error = 2,
    /// The panel session is lost
    Critical = 3,
}

impl ErrorSeverity {
    /// Lower-case label used in status strings.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorSeverity::Info => "info",
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_from_info_to_critical() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    #[test]
    fn severity_display_is_lowercase() {
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
        assert_eq!(ErrorSeverity::Info.to_string(), "info");
    }
}
