use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document store returned HTTP {status}: {message}")]
    Store { status: u16, message: String },

    #[error("Permission denied by document store: {message}")]
    PermissionDenied { message: String },

    #[error("Not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Property {property_id} is already booked between {check_in} and {check_out}")]
    Unavailable {
        property_id: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Invalid booking parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Failed to decode document: {reason}")]
    Decode { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl StayError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Human-readable message for presenting a failure to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied { .. } => "You must be logged in to make a booking".into(),
            Self::Unavailable { .. } => {
                "These dates are no longer available. Please choose different dates.".into()
            }
            Self::NotFound { collection, .. } if collection == "properties" => {
                "Property not found".into()
            }
            Self::NotFound { .. } => "Booking not found".into(),
            Self::InvalidParams { reason } => reason.clone(),
            Self::Http(_) | Self::Store { .. } => {
                "Failed to reach the booking service. Please try again.".into()
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StayError>;
