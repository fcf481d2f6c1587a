use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use log::{debug, info};

use crate::device::types::ConnectionState;

type Observer = Box<dyn FnMut(ConnectionState) + Send>;

struct RemoteDeviceInner {
    name: String,
    connected: bool,
    observers: Vec<(u64, Observer)>,
    next_observer_id: u64,
}

/// An external connection endpoint. Clones share the same connection state and observers.
///
/// Observers run synchronously on the thread that calls `connect` or `disconnect`, while the
/// remote's lock is held. They must not call back into the same `RemoteDevice`.
#[derive(Clone)]
pub struct RemoteDevice {
    inner: Arc<Mutex<RemoteDeviceInner>>,
}

impl RemoteDevice {
    pub fn new(name: impl Into<String>) -> Self {
        let inner = RemoteDeviceInner {
            name: name.into(),
            connected: false,
            observers: Vec::new(),
            next_observer_id: 0,
        };
        RemoteDevice { inner: Arc::new(Mutex::new(inner)) }
    }

    fn lock(&self) -> MutexGuard<'_, RemoteDeviceInner> {
        self.inner.lock().expect("Failed to lock RemoteDevice inner")
    }

    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from(self.lock().connected)
    }

    pub fn connect(&self) {
        self.set_connected(true);
    }

    pub fn disconnect(&self) {
        self.set_connected(false);
    }

    // Edge triggered: observers only hear about actual changes.
    fn set_connected(&self, connected: bool) {
        let mut inner = self.lock();
        let state = ConnectionState::from(connected);

        if inner.connected == connected {
            debug!("Remote device {} is already {}", inner.name, state);
            return;
        }

        inner.connected = connected;
        info!("Remote device {} {}", inner.name, state);

        for (_, observer) in inner.observers.iter_mut() {
            observer(state);
        }
    }

    /// Registers `observer`. It is called once with the current state before this returns, then
    /// on every transition until the returned `Subscription` is dropped.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(ConnectionState) + Send + 'static,
    {
        let mut observer: Observer = Box::new(observer);
        let mut inner = self.lock();

        // sample and register under one lock so that no transition is lost in between
        observer(ConnectionState::from(inner.connected));

        let id = inner.next_observer_id;
        inner.next_observer_id += 1;
        inner.observers.push((id, observer));
        debug!("Remote device {} gained observer {}", inner.name, id);

        Subscription { remote: Arc::downgrade(&self.inner), id }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().observers.len()
    }
}

impl fmt::Debug for RemoteDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("RemoteDevice")
            .field("name", &inner.name)
            .field("connected", &inner.connected)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

/// Keeps an observer registered with a `RemoteDevice`. Dropping it removes the observer.
/// Must not be dropped from inside an observer of the same remote.
pub struct Subscription {
    remote: Weak<Mutex<RemoteDeviceInner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(remote) = self.remote.upgrade() else {
            return;
        };

        // the lock is poisoned if an observer panicked
        let mut inner = match remote.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.observers.retain(|(id, _)| *id != self.id);
        debug!("Remote device {} lost observer {}", inner.name, self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
