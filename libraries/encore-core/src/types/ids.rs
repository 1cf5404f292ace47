/// ID types for Encore entities
///
/// The hosted store keys every table by a UUID rendered as text, so each ID is
/// a transparent string newtype.
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// User (profile) identifier
    UserId
);
string_id!(
    /// Artist identifier
    ArtistId
);
string_id!(
    /// Track identifier
    TrackId
);
string_id!(
    /// Feed post identifier
    PostId
);
string_id!(
    /// Purchase identifier
    PurchaseId
);
string_id!(
    /// Live-stream announcement identifier
    StreamId
);
