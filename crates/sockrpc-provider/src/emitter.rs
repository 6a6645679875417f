//! Generic publish/subscribe core the provider is built on.
//!
//! Listeners are `mpsc` channels: [`EventEmitter::on`] hands back a
//! receiver, [`EventEmitter::emit`] forwards the payload to every live
//! listener registered under the event name. Event names are dynamic
//! strings because subscription events are named after node-issued
//! subscription identifiers.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::mpsc;

/// Channel-based event emitter.
///
/// Emission is synchronous and non-blocking: payloads land in unbounded
/// listener channels in registration order. Listeners whose receiver has
/// been dropped are pruned on the next emit.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<Value>>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event` and return its receiving end.
    pub fn on(&self, event: &str) -> mpsc::UnboundedReceiver<Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .unwrap()
            .entry(event.to_string())
            .or_default()
            .push(tx);
        rx
    }

    /// Deliver `payload` to every live listener of `event`.
    ///
    /// Returns the number of listeners reached.
    pub fn emit(&self, event: &str, payload: Value) -> usize {
        let mut listeners = self.listeners.lock().unwrap();
        let Some(senders) = listeners.get_mut(event) else {
            return 0;
        };

        let mut delivered = 0;
        senders.retain(|tx| match tx.send(payload.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });
        if senders.is_empty() {
            listeners.remove(event);
        }
        delivered
    }

    /// Drop every listener registered under `event`.
    pub fn remove_listeners(&self, event: &str) {
        self.listeners.lock().unwrap().remove(event);
    }

    /// Number of live listeners registered under `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .get(event)
            .map_or(0, Vec::len)
    }
}
