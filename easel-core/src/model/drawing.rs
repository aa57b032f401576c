use serde::{Deserialize, Serialize};

/// One stroke segment drawn by a peer.
///
/// This is the message browsers exchange over their data channels. The relay
/// forwards it as opaque bytes and never decodes it; the type documents the
/// shape peers have to agree on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawLine {
    pub prev_x: i32,
    pub prev_y: i32,
    pub curr_x: i32,
    pub curr_y: i32,
    pub color: String,
}
