use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use uuid::Uuid;

use crate::state::AppState;
use crate::ws::actor;

/// GET /ws
/// WebSocket upgrade endpoint onto the broadcast relay. The chat is open to
/// anonymous visitors, so no token is required here. Each upgrade gets a
/// fresh connection id and its own actor.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let client_id = Uuid::now_v7();
    ws.on_upgrade(move |socket| actor::run_connection(socket, state, client_id))
}
