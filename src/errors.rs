//! Unified error handling.
//!
//! Error types are generated by a macro so every variant carries an error
//! code and a type name alongside its message.

use std::fmt;

/// Defines the crate error enum.
///
/// Generates:
/// - the enum definition
/// - `code()` - returns the error code
/// - `error_type()` - returns the error type name
/// - `message()` - returns the error detail
/// - snake_case convenience constructors
macro_rules! define_gradebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradebookError {
            $($variant(String),)*
        }

        impl GradebookError {
            /// Error code, stable across releases.
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $code,)*
                }
            }

            /// Human-readable error type name.
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $type_name,)*
                }
            }

            /// Error detail text.
            pub fn message(&self) -> &str {
                match self {
                    $(GradebookError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl GradebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradebookError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradebook_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    Network("E003", "Network Error"),
    ServerRejected("E004", "Server Rejected Request"),
    Validation("E005", "Validation Error"),
    WeekNotAvailable("E006", "Week Not Available"),
    ScoreAboveCeiling("E007", "Score Above Ceiling"),
    MissingTermContext("E008", "Missing Term Context"),
    SubjectNotFound("E009", "Subject Not Found"),
    Serialization("E010", "Serialization Error"),
    SessionPersistence("E011", "Session Persistence Error"),
}

impl GradebookError {
    /// True for failures caught before any network call is made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GradebookError::Validation(_)
                | GradebookError::WeekNotAvailable(_)
                | GradebookError::ScoreAboveCeiling(_)
                | GradebookError::MissingTermContext(_)
                | GradebookError::SubjectNotFound(_)
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GradebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradebookError {}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GradebookError {
    fn from(err: std::io::Error) -> Self {
        GradebookError::SessionPersistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;
