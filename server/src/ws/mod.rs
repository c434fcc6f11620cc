pub mod actor;
pub mod broadcast;
pub mod handler;

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifier for a single WebSocket connection. A reconnect is a new id.
pub type ClientId = Uuid;

/// Type alias for the sender half of a connection's outbound channel.
/// Other parts of the system can clone this to push messages to a specific client.
pub type ClientSender = mpsc::UnboundedSender<axum::extract::ws::Message>;

/// Client registry: every currently-connected chat client, keyed by
/// connection id. The map key guarantees a client appears at most once.
/// Arc<DashMap<ClientId, ClientSender>>
pub type ClientRegistry = Arc<DashMap<ClientId, ClientSender>>;

/// Create a new empty client registry.
pub fn new_client_registry() -> ClientRegistry {
    Arc::new(DashMap::new())
}

/// Add a newly-handshaked client to the registry. It becomes a broadcast
/// target immediately. A given physical connection registers exactly once.
pub fn register(registry: &ClientRegistry, id: ClientId, sender: ClientSender) {
    registry.insert(id, sender);
    tracing::debug!(client_id = %id, clients = registry.len(), "Client registered");
}

/// Remove a client from the registry. Safe to call for an id that was
/// already removed (no-op, not an error).
pub fn unregister(registry: &ClientRegistry, id: &ClientId) {
    registry.remove(id);
    tracing::debug!(client_id = %id, clients = registry.len(), "Client unregistered");
}
