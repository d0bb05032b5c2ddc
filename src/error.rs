//! Error types for the snippet store.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by [`SnippetStore`](crate::store::SnippetStore) mutations.
///
/// A mutation that returns one of these has still been applied in memory;
/// only the write to storage failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A slot could not be written to the persistence substrate.
    #[error("Failed to persist '{slot}': {source}")]
    Persist {
        slot: &'static str,
        #[source]
        source: StorageError,
    },

    /// A collection could not be encoded as JSON.
    #[error("Failed to serialize '{slot}': {source}")]
    Serialize {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// The storage slot the failure concerns.
    pub fn slot(&self) -> &'static str {
        match self {
            Self::Persist { slot, .. } | Self::Serialize { slot, .. } => slot,
        }
    }

    /// Returns a short message suitable for a transient notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Persist {
                source: StorageError::QuotaExceeded { .. },
                ..
            } => "Storage is full; the change is kept for this session only".to_string(),
            Self::Persist { .. } => {
                "Could not save; the change is kept for this session only".to_string()
            }
            Self::Serialize { slot, .. } => format!("Could not encode {slot} for saving"),
        }
    }
}

/// Convenience alias that pins the error type to [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_failures_get_a_specific_message() {
        let err = StoreError::Persist {
            slot: "code-snippets",
            source: StorageError::QuotaExceeded {
                key: "code-snippets".to_string(),
                needed: 20,
                limit: 10,
            },
        };
        assert!(err.user_message().contains("full"));
        assert!(err.to_string().contains("code-snippets"));
    }
}
