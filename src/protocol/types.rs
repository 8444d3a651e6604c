//! Wire types for the chat endpoint

use crate::transcript::SessionId;
use serde::{Deserialize, Serialize};

/// Body of `POST <chat>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Serialized as `null` until the backend has assigned a session
    pub session_id: Option<SessionId>,
}

/// Chat endpoint response. Error bodies (`{"error": ...}`) carry no
/// `success` field and read as `success == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Form-type discriminator; the engine only cares whether it is set
    #[serde(default)]
    pub show_form: Option<String>,
}
