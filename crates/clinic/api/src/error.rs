use serde::{Deserialize, Serialize};

/// Failure body returned by the backend on non-2xx responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
