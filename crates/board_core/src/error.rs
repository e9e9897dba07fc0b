use thiserror::Error;

use crate::PilotId;

/// Data anomalies met while boarding. None of these are fatal: the step that
/// hit one is skipped and the session still cleans up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unknown boarding item: {0:?}")]
    UnknownLootCategory(String),
    #[error("boarding target {0} no longer exists")]
    MissingTarget(PilotId),
    #[error("pilot {0} has no target")]
    NoTarget(PilotId),
}
