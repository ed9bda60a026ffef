use thiserror::Error;

/// 提供者拒絕但沒有附帶任何訊息時的預設摘要
pub const GENERIC_API_ERROR: &str = "Error has occurred while processing request.";

/// 標籤內容不是 PDF 時的錯誤訊息
pub const UNSUPPORTED_LABEL_MESSAGE: &str = "Unsupported label mime type.";

#[derive(Error, Debug)]
pub enum ShipmentError {
    #[error("Transport error: {message}")]
    Transport { message: String, code: Option<u16> },

    #[error("{message}")]
    Api {
        message: String,
        error_messages: Vec<String>,
    },

    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String },

    #[error("Label fetch failed for {url}: {message}")]
    LabelFetch { url: String, message: String },

    #[error("{}", UNSUPPORTED_LABEL_MESSAGE)]
    UnsupportedLabel { source_name: String },

    #[error("PDF processing error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Label payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// 錯誤分類，呼叫端依此做 pattern match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 網路或 HTTP 層失敗（DNS、連線被拒、逾時、非 2xx 狀態）
    Transport,
    /// 提供者明確拒絕請求
    ApiRejected,
    /// 內容驗證失敗（例如標籤不是 PDF）
    Validation,
    Configuration,
    Internal,
}

impl ShipmentError {
    pub fn api(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Api {
            error_messages: vec![message.clone()],
            message,
        }
    }

    /// 由提供者訊息列表建立錯誤，摘要為以單一空白串接的訊息
    pub fn rejected(error_messages: Vec<String>) -> Self {
        let message = if error_messages.is_empty() {
            GENERIC_API_ERROR.to_string()
        } else {
            error_messages.join(" ")
        };
        Self::Api {
            message,
            error_messages,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::LabelFetch { .. } => ErrorKind::Transport,
            Self::Api { .. } => ErrorKind::ApiRejected,
            Self::MalformedResponse { .. } | Self::UnsupportedLabel { .. } | Self::Base64(_) => {
                ErrorKind::Validation
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorKind::Configuration
            }
            Self::Pdf(_) | Self::SerializationError(_) | Self::IoError(_) => ErrorKind::Internal,
        }
    }

    /// 提供者回傳的訊息（依原始順序）；非 API 錯誤回傳空切片
    pub fn error_messages(&self) -> &[String] {
        match self {
            Self::Api { error_messages, .. } => error_messages,
            _ => &[],
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.error_messages().is_empty()
    }

    /// HTTP 狀態碼（若有）
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Transport { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ShipmentError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            code: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShipmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_joins_messages_with_space() {
        let err = ShipmentError::rejected(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(err.to_string(), "A B");
        assert_eq!(err.error_messages(), ["A", "B"]);
        assert!(err.has_errors());
        assert_eq!(err.kind(), ErrorKind::ApiRejected);
    }

    #[test]
    fn test_rejected_without_messages_uses_generic_summary() {
        let err = ShipmentError::rejected(Vec::new());
        assert_eq!(err.to_string(), GENERIC_API_ERROR);
        assert!(!err.has_errors());
    }

    #[test]
    fn test_kinds() {
        let transport = ShipmentError::Transport {
            message: "connection refused".to_string(),
            code: None,
        };
        assert_eq!(transport.kind(), ErrorKind::Transport);
        assert_eq!(transport.code(), None);

        let label = ShipmentError::UnsupportedLabel {
            source_name: "https://example.com/a.pdf".to_string(),
        };
        assert_eq!(label.kind(), ErrorKind::Validation);
        assert_eq!(label.to_string(), UNSUPPORTED_LABEL_MESSAGE);

        let config = ShipmentError::ConfigError {
            message: "missing".to_string(),
        };
        assert_eq!(config.kind(), ErrorKind::Configuration);
        assert!(!config.has_errors());
    }
}
