//! Error types for Themesmith
//!
//! Uses `thiserror` for library errors. Per-component failures are
//! isolated by the build pipeline; only genuinely fatal conditions
//! bubble out of a command.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Themesmith operations
pub type ThemeResult<T> = Result<T, ThemeError>;

/// Main error type for Themesmith operations
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Stylesheet failed to compile; the component's `.css` artifact is
    /// skipped and the build continues
    #[error("stylesheet compile error in '{component}': {message}")]
    StyleCompile { component: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid theme.toml
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Filesystem watcher could not be established
    #[error("watch error: {0}")]
    Watch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_style_compile() {
        let err = ThemeError::StyleCompile {
            component: "hero".to_string(),
            message: "expected \"}\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "stylesheet compile error in 'hero': expected \"}\""
        );
    }

    #[test]
    fn test_error_display_invalid_config() {
        let err = ThemeError::InvalidConfig {
            file: PathBuf::from("theme.toml"),
            message: "expected a table".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config in theme.toml: expected a table"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ThemeError = io.into();
        assert!(err.to_string().contains("gone"));
    }
}
