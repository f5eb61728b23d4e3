//! Request/response shapes of the player identity service.

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Player record returned by every identity endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub session_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub chips: u32,
    #[serde(default)]
    pub is_permanent: bool,
}

/// `POST /api/player`: create a player, or fetch the one bound to `session_id`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreatePlayerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// `POST /api/player/username`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetUsernameRequest {
    pub session_id: String,
    pub username: String,
}

/// `POST /api/player/chips`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClaimChipsRequest {
    pub session_id: String,
}

/// Error body of a rejected identity request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}
