//! Error categories

use serde::{Deserialize, Serialize};

/// Classification of return codes by failure domain.
///
/// Validation, authorization, not-found and conflict failures are all
/// rejected before any write happens; only `System` failures can leave
/// state behind (bounded by transaction scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Operation succeeded
    Success,
    /// Caller sent missing or invalid fields; nothing was mutated
    Validation,
    /// Caller identity or role is insufficient; nothing was mutated
    Authorization,
    /// A referenced entity does not exist; nothing was mutated
    NotFound,
    /// Current state forbids the operation (locks, duplicates); nothing was mutated
    Conflict,
    /// Store or server failure, surfaced generically
    System,
}
