//! Scenario loading errors.

use thiserror::Error;

/// Why a scenario could not be loaded.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// No scenario with this id exists.
    #[error("Scenario {0} not found")]
    NotFound(String),

    /// The scenario exists but is malformed.
    #[error("scenario {id} is malformed: {reason}")]
    Parse { id: String, reason: String },

    /// The scenario exists but could not be read.
    #[error("failed to read scenario {id}: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScenarioError {
    pub fn parse(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Text carried by the `error` event published for a failed run.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(id) => format!("Scenario {id} not found"),
            Self::Parse { reason, .. } => format!("Scenario load failed: {reason}"),
            Self::Io { source, .. } => format!("Scenario load failed: {source}"),
        }
    }
}
