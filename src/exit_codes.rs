//! Custom exit codes for the mbexport application
//!
//! This module defines specific exit codes for different error conditions
//! to make scripting and automation easier.

/// Custom exit codes for mbexport
///
/// These codes follow the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Custom application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbExitCode {
    /// Success (0) - Export completed successfully
    Success = 0,

    /// Data format error (65) - Response or report data was malformed
    DataError = 65,

    /// Internal software error (70) - Unexpected application error
    SoftwareError = 70,

    /// System error (71) - OS-level error while writing a report
    OSError = 71,

    /// Configuration error (78) - Missing or invalid environment settings
    ConfigError = 78,

    /// Authentication error (100) - Login or session token issues
    AuthError = 100,

    /// Network error (101) - Connection or communication issues
    NetworkError = 101,

    /// API error (102) - Metabase returned an error response
    ApiError = 102,
}

impl MbExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get descriptive message for the exit code
    pub fn message(&self) -> &'static str {
        match self {
            MbExitCode::Success => "Success",
            MbExitCode::DataError => "Data format error",
            MbExitCode::SoftwareError => "Internal software error",
            MbExitCode::OSError => "Operating system error",
            MbExitCode::ConfigError => "Configuration error",
            MbExitCode::AuthError => "Authentication error",
            MbExitCode::NetworkError => "Network communication error",
            MbExitCode::ApiError => "Remote API error",
        }
    }
}

impl From<MbExitCode> for i32 {
    fn from(code: MbExitCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_match_sysexits() {
        assert_eq!(MbExitCode::Success.code(), exitcode::OK);
        assert_eq!(MbExitCode::DataError.code(), exitcode::DATAERR);
        assert_eq!(MbExitCode::SoftwareError.code(), exitcode::SOFTWARE);
        assert_eq!(MbExitCode::OSError.code(), exitcode::OSERR);
        assert_eq!(MbExitCode::ConfigError.code(), exitcode::CONFIG);
    }
}
