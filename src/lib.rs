use serde::{Serialize, ser::Serializer};

pub mod models;

pub type Result<T> = std::result::Result<T, Error>;

/// meet-user-info Error enum
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A recognized bundle key holds a value of another type than the one the key carries.
    #[error("bundle key `{key}` holds a {found} value, expected a {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

// Re-exports

pub use models::bundle::{Bundle, BundleValue};
pub use models::settings::SettingsUpdate;
pub use models::user_info::{UserInfo, keys};

// Collaborators need to build avatar URLs
pub use url::Url;
