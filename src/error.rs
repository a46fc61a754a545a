use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeammateError {
    #[error("Not logged in. Please run 'teammate login' first.")]
    NotLoggedIn,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API request failed ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl TeammateError {
    /// True for failures of the transport itself (connection refused, bad body),
    /// as opposed to answers the server gave us.
    pub fn is_network(&self) -> bool {
        matches!(self, TeammateError::RequestError(_) | TeammateError::JsonError(_))
    }
}

pub type TeammateResult<T> = Result<T, TeammateError>;

pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> TeammateResult<T>;
    fn with_context<F>(self, f: F) -> TeammateResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn context(self, msg: &str) -> TeammateResult<T> {
        self.map_err(|e| TeammateError::Unknown(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> TeammateResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TeammateError::Unknown(format!("{}: {}", f(), e)))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, msg: &str) -> TeammateResult<T> {
        self.ok_or_else(|| TeammateError::Unknown(msg.to_string()))
    }

    fn with_context<F>(self, f: F) -> TeammateResult<T>
    where
        F: FnOnce() -> String,
    {
        self.ok_or_else(|| TeammateError::Unknown(f()))
    }
}

#[macro_export]
macro_rules! teammate_error {
    ($error_type:ident, $msg:expr) => {
        $crate::error::TeammateError::$error_type($msg.to_string())
    };
    ($error_type:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::error::TeammateError::$error_type(format!($fmt, $($arg)*))
    };
}
