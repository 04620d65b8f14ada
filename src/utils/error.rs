use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("QR encoding error: {0}")]
    QrEncodeError(#[from] qrcode::types::QrError),

    #[error("Font '{path}' could not be loaded: {reason}")]
    FontError { path: String, reason: String },

    #[error("No tenant access token returned (code: {code:?})")]
    MissingTokenError { code: Option<i64> },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Rendering,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExportError::ApiError(_) | ExportError::MissingTokenError { .. } => {
                ErrorCategory::Network
            }
            ExportError::SerializationError(_) => ErrorCategory::Data,
            ExportError::ImageError(_)
            | ExportError::QrEncodeError(_)
            | ExportError::FontError { .. } => ErrorCategory::Rendering,
            ExportError::IoError(_) => ErrorCategory::System,
            ExportError::ConfigError { .. }
            | ExportError::ConfigValidationError { .. }
            | ExportError::InvalidConfigValueError { .. }
            | ExportError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常重試即可
            ExportError::ApiError(_) => ErrorSeverity::Medium,
            ExportError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExportError::ApiError(_) => "Check network connectivity and the Feishu base URL, then retry",
            ExportError::MissingTokenError { .. } => {
                "Verify app_id / app_secret and that the app is enabled for the tenant"
            }
            ExportError::SerializationError(_) => {
                "The remote service returned an unexpected body; inspect the raw response"
            }
            ExportError::ImageError(_) | ExportError::QrEncodeError(_) => {
                "The record text may be too long for a QR code; shorten the source fields"
            }
            ExportError::FontError { .. } => {
                "Point render.font_path (or --font) at an existing TrueType font file"
            }
            ExportError::IoError(_) => {
                "Make sure the output directory exists and is writable"
            }
            ExportError::ConfigError { .. }
            | ExportError::ConfigValidationError { .. }
            | ExportError::InvalidConfigValueError { .. }
            | ExportError::MissingConfigError { .. } => {
                "Fix the configuration file and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        let label = match self.category() {
            ErrorCategory::Network => "Feishu API problem",
            ErrorCategory::Data => "Unexpected data",
            ErrorCategory::Rendering => "Could not render QR card",
            ErrorCategory::Configuration => "Configuration problem",
            ErrorCategory::System => "System error",
        };
        format!("{}: {}", label, self)
    }
}

/// 單筆記錄無法正規化的原因；該筆記錄會被整筆略過
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("field '{field}' expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' holds an out-of-range timestamp: {millis}")]
    InvalidTimestamp { field: String, millis: i64 },
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_and_category() {
        let err = ExportError::MissingTokenError { code: Some(10003) };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("10003"));

        let err = ExportError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "qrcodes",
        ));
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message() {
        let err = ExportError::FontError {
            path: "msyhl.ttc".to_string(),
            reason: "not found".to_string(),
        };
        let message = err.user_friendly_message();
        assert!(message.starts_with("Could not render QR card"));
        assert!(message.contains("msyhl.ttc"));
    }
}
