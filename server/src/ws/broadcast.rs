//! Broadcast relay: fan a chat message out to every registered client.
//!
//! The target set is snapshotted at the moment a broadcast begins; a client
//! registering while the fan-out is in flight may or may not receive that
//! message. Delivery is best-effort, at-most-once per target.

use axum::extract::ws::Message;
use chrono::Local;

use super::{ClientId, ClientRegistry, ClientSender};

/// Deliver `text` to every currently-registered client, prefixed with the
/// server-side receipt time as `[HH:MM:SS] `. The stamp is attached once per
/// broadcast, not per target.
///
/// A failed send means the client's outbound channel is broken: that client
/// is unregistered and the fan-out continues with the remaining targets.
/// Returns (delivered, removed) counts.
pub fn broadcast_text(registry: &ClientRegistry, text: &str) -> (usize, usize) {
    let stamped = format!("[{}] {}", Local::now().format("%H:%M:%S"), text);

    // Snapshot the target set before sending. Removing a failed target from
    // the registry must not invalidate iteration over the remaining ones.
    let targets: Vec<(ClientId, ClientSender)> = registry
        .iter()
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();

    let mut delivered = 0;
    let mut removed = 0;

    for (id, sender) in targets {
        if sender.send(Message::Text(stamped.clone().into())).is_ok() {
            delivered += 1;
        } else {
            // Broken outbound channel is a disconnect signal for that one
            // client only, never an error for the sender or other targets.
            super::unregister(registry, &id);
            removed += 1;
        }
    }

    (delivered, removed)
}
