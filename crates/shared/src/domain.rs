use serde::{Deserialize, Serialize};

/// Tag for one upload/summary exchange.
///
/// Ids increase monotonically for the lifetime of a session (clearing the
/// session does not reset them), so a completion can be matched against the
/// transfer that is still current and dropped otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferId(pub i64);
