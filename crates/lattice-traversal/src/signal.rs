//! Listener fan-out for focus notifications.
//!
//! [`Signal<Args>`] keeps an ordered list of subscriber callbacks. Emission
//! walks the list from the most recently connected slot to the oldest, and
//! every slot receives a reference to the same payload.
//!
//! Subscriptions are released explicitly, either through
//! [`Signal::disconnect`] or by dropping the [`ConnectionGuard`] returned by
//! [`Signal::connect_scoped`].
//!
//! ```
//! use lattice_traversal::Signal;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! let signal = Signal::<i32>::new();
//! let total = Arc::new(AtomicI32::new(0));
//! {
//!     let total = total.clone();
//!     let _guard = signal.connect_scoped(move |&n| {
//!         total.fetch_add(n, Ordering::SeqCst);
//!     });
//!     signal.emit(42);
//! }
//! signal.emit(1); // guard dropped, nobody listening
//! assert_eq!(total.load(Ordering::SeqCst), 42);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Identifies a signal-slot connection.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    /// Connection order, oldest first.
    order: Vec<ConnectionId>,
}

/// A notification source with any number of connected slots.
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

impl<Args> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                order: Vec::new(),
            }),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot. Returns an ID for [`disconnect`](Self::disconnect).
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Connect a slot that stays connected until the returned guard is dropped.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            signal: self,
            id: Some(self.connect(slot)),
        }
    }

    /// Disconnect a slot. Returns `false` if it was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_none() {
            return false;
        }
        connections.order.retain(|&other| other != id);
        true
    }

    /// Disconnect every slot.
    pub fn disconnect_all(&self) {
        let mut connections = self.connections.lock();
        connections.slots.clear();
        connections.order.clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Suppress or resume emission.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emission is suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invoke every connected slot with `args`, newest connection first.
    pub fn emit(&self, args: Args) {
        self.emit_with(|| args);
    }

    /// Like [`emit`](Self::emit), but only builds the payload if at least one
    /// slot is connected and the signal is not blocked.
    ///
    /// The payload is built once and shared by all slots.
    pub fn emit_with(&self, make_args: impl FnOnce() -> Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        // Slots run without the lock held so they may disconnect themselves.
        let slots: Vec<Slot<Args>> = {
            let connections = self.connections.lock();
            connections
                .order
                .iter()
                .rev()
                .filter_map(|id| connections.slots.get(*id).cloned())
                .collect()
        };
        if slots.is_empty() {
            return;
        }

        tracing::trace!(
            target: targets::SIGNAL,
            connection_count = slots.len(),
            "emitting signal"
        );
        let args = make_args();
        for slot in slots {
            slot(&args);
        }
    }
}

/// Disconnects its slot when dropped.
///
/// Created by [`Signal::connect_scoped`]. The guard borrows the signal, so
/// the signal always outlives its scoped connections.
#[must_use = "dropping the guard disconnects the slot immediately"]
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<Args> ConnectionGuard<'_, Args> {
    /// The underlying connection ID.
    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// Keep the connection alive past the guard, returning its ID.
    pub fn detach(mut self) -> Option<ConnectionId> {
        self.id.take()
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_last_connected_runs_first() {
        let signal = Signal::<()>::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            signal.connect(move |_| calls.lock().push(name));
        }

        signal.emit(());
        assert_eq!(*calls.lock(), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_disconnect_keeps_order_of_remaining() {
        let signal = Signal::<()>::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let calls = calls.clone();
            ids.push(signal.connect(move |_| calls.lock().push(name)));
        }

        assert!(signal.disconnect(ids[1]));
        assert!(!signal.disconnect(ids[1]));
        signal.emit(());
        assert_eq!(*calls.lock(), vec!["c", "a"]);
    }

    #[test]
    fn test_payload_built_once_and_only_when_needed() {
        let signal = Signal::<String>::new();
        let builds = Arc::new(Mutex::new(0));

        let builds_clone = builds.clone();
        signal.emit_with(move || {
            *builds_clone.lock() += 1;
            String::from("unused")
        });
        assert_eq!(*builds.lock(), 0);

        for _ in 0..3 {
            signal.connect(|s: &String| assert_eq!(s, "shared"));
        }
        let builds_clone = builds.clone();
        signal.emit_with(move || {
            *builds_clone.lock() += 1;
            String::from("shared")
        });
        assert_eq!(*builds.lock(), 1);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| received_clone.lock().push(value));

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.lock(), vec![1, 3]);
    }

    #[test]
    fn test_scoped_guard_disconnects() {
        let signal = Signal::<i32>::new();
        {
            let _guard = signal.connect_scoped(|_| {});
            assert_eq!(signal.connection_count(), 1);
        }
        assert_eq!(signal.connection_count(), 0);

        let kept = signal.connect_scoped(|_| {}).detach();
        assert!(kept.is_some());
        assert_eq!(signal.connection_count(), 1);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }
}
