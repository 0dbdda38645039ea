use thiserror::Error;

/// Message used when the question is blank after trimming.
pub const EMPTY_QUESTION_MESSAGE: &str = "A pergunta não pode estar vazia";
/// Fallback for a server error response without a usable `detail`.
pub const SERVER_ERROR_FALLBACK: &str = "Erro ao processar a pergunta";
/// Message used when the request went out but no response came back.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Não foi possível obter resposta do servidor. Verifique sua conexão.";
/// Prefix for failures that happen before the request is sent.
pub const REQUEST_SETUP_PREFIX: &str = "Erro ao preparar a consulta: ";

/// Raw failure of the HTTP layer, before any normalization.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("API request failed with status: {status}")]
    Response { status: u16, body: String },

    /// The request was sent but no response arrived (connect failure, timeout, broken body).
    #[error("No response from server: {0}")]
    NoResponse(#[source] reqwest::Error),

    /// The request could not be built.
    #[error("Failed to build request: {message}")]
    Setup { message: String },
}

impl TransportError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::Setup {
                message: err.to_string(),
            }
        } else {
            TransportError::NoResponse(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{message}")]
    ServerError { status: u16, message: String },

    #[error("{message}")]
    NetworkError { message: String },

    #[error("{message}")]
    RequestSetupError { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

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

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Server,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::InvalidInput { .. } => ErrorCategory::Input,
            ClientError::Transport(TransportError::Response { .. })
            | ClientError::ServerError { .. } => ErrorCategory::Server,
            ClientError::Transport(_)
            | ClientError::NetworkError { .. }
            | ClientError::RequestSetupError { .. } => ErrorCategory::Network,
            ClientError::MalformedResponse { .. } => ErrorCategory::Data,
            ClientError::ConfigError { .. }
            | ClientError::ConfigValidationError { .. }
            | ClientError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ClientError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Server | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether repeating the same call could succeed. Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(TransportError::NoResponse(_))
            | ClientError::NetworkError { .. } => true,
            ClientError::Transport(TransportError::Response { status, .. })
            | ClientError::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::InvalidInput { message }
            | ClientError::ServerError { message, .. }
            | ClientError::NetworkError { message }
            | ClientError::RequestSetupError { message } => message.clone(),
            ClientError::Transport(TransportError::Response { status, .. }) => {
                format!("The server rejected the request (HTTP {})", status)
            }
            ClientError::Transport(TransportError::NoResponse(_)) => {
                "The server did not respond".to_string()
            }
            ClientError::Transport(TransportError::Setup { message }) => {
                format!("The request could not be prepared: {}", message)
            }
            ClientError::MalformedResponse { .. } => {
                "The server returned an unexpected response".to_string()
            }
            ClientError::ConfigError { .. }
            | ClientError::ConfigValidationError { .. }
            | ClientError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
            ClientError::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Provide a non-empty question",
            ErrorCategory::Network => {
                "Check that the backend is running and reachable at the configured base URL"
            }
            ErrorCategory::Server => "Inspect the backend logs for the failing request",
            ErrorCategory::Data => "Make sure the client and backend versions match",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_errors_display_message_only() {
        let err = ClientError::ServerError {
            status: 422,
            message: "bad request".to_string(),
        };
        assert_eq!(err.to_string(), "bad request");

        let err = ClientError::NetworkError {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        };
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: ClientError = TransportError::Response {
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API request failed with status: 500");
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_severity_by_category() {
        let input = ClientError::InvalidInput {
            message: EMPTY_QUESTION_MESSAGE.to_string(),
        };
        assert_eq!(input.severity(), ErrorSeverity::High);
        assert!(!input.is_retryable());

        let setup = ClientError::RequestSetupError {
            message: format!("{}bad url", REQUEST_SETUP_PREFIX),
        };
        assert_eq!(setup.severity(), ErrorSeverity::Medium);

        let config = ClientError::ConfigError {
            message: "missing".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = ClientError::ServerError {
            status: 404,
            message: "Nenhum documento relevante encontrado.".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.user_friendly_message(), "Nenhum documento relevante encontrado.");
    }
}
