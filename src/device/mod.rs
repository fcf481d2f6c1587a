use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use futures::channel::mpsc::Sender;
use log::{info, warn};

use crate::device::model::Model;
use crate::device::remote::{RemoteDevice, Subscription};
use crate::device::types::{ConnectionState, DeviceEvent, DeviceStatus};
use crate::error::DeviceError;

pub mod constants;
pub mod model;
pub mod remote;
pub mod types;

#[derive(Debug)]
struct DeviceInner {
    status: DeviceStatus,
    started: bool,
    model: Model,
    senders: Vec<Sender<DeviceEvent>>,
}

impl DeviceInner {
    // status and model change together so that `Connected` always means a loaded model
    fn apply(&mut self, state: ConnectionState) {
        let status = match state {
            ConnectionState::Connected => {
                self.model.load();
                DeviceStatus::Connected
            },
            ConnectionState::Disconnected => {
                self.model.unload();
                DeviceStatus::Disconnected
            },
        };

        if self.status == status {
            return;
        }

        info!("Device status {} -> {}", self.status, status);
        self.status = status;
        self.publish(DeviceEvent::StatusChange(status));
    }

    fn publish(&mut self, event: DeviceEvent) {
        self.senders.retain_mut(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(err) if err.is_disconnected() => false,
            Err(err) => {
                warn!("Dropping DeviceEvent: {}", err);
                true
            },
        });
    }
}

/// Mirrors the connection state of a `RemoteDevice` once started.
///
/// Until `start` is called the device stays `Stopped` with an empty model, whatever the remote
/// does. `start` samples the remote's current state, and every later transition of the remote is
/// applied synchronously. Dropping the device unsubscribes it from the remote.
#[derive(Debug)]
pub struct Device {
    // declared first so it is dropped before `inner`
    subscription: OnceLock<Subscription>,
    inner: Arc<Mutex<DeviceInner>>,
    remote: RemoteDevice,
}

impl Device {
    pub fn new(remote: RemoteDevice) -> Self {
        Device::with_senders(remote, Vec::new())
    }

    /// Every status change is published to `senders` without blocking.
    pub fn with_senders(remote: RemoteDevice, senders: Vec<Sender<DeviceEvent>>) -> Self {
        let inner = DeviceInner {
            status: DeviceStatus::Stopped,
            started: false,
            model: Model::new(),
            senders,
        };

        Device {
            subscription: OnceLock::new(),
            inner: Arc::new(Mutex::new(inner)),
            remote,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceInner> {
        self.inner.lock().expect("Failed to lock Device inner")
    }

    pub fn status(&self) -> DeviceStatus {
        self.lock().status
    }

    pub fn model(&self) -> Model {
        self.lock().model
    }

    pub fn is_started(&self) -> bool {
        self.lock().started
    }

    pub fn remote(&self) -> &RemoteDevice {
        &self.remote
    }

    pub fn start(&self) -> Result<(), DeviceError> {
        // never hold our own lock while calling into the remote
        let name = self.remote.name();

        {
            let mut inner = self.lock();
            if inner.started {
                return Err(DeviceError::AlreadyStarted { name });
            }
            inner.started = true;
        }

        info!("Starting device for remote {}", name);

        let weak_inner = Arc::downgrade(&self.inner);
        let subscription = self.remote.subscribe(move |state| {
            if let Some(inner) = weak_inner.upgrade() {
                inner.lock().expect("Failed to lock Device inner").apply(state);
            }
        });

        self.subscription.set(subscription).expect("Device subscription set twice");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc::channel;
    use super::*;

    fn assert_consistent(device: &Device) {
        let model = device.model();
        assert_eq!(device.status() == DeviceStatus::Connected, model.loaded());
        assert_eq!(model.loaded(), !model.empty());
    }

    #[test]
    fn fresh_device_is_stopped_and_empty() {
        let device = Device::new(RemoteDevice::new("plc"));

        assert_eq!(device.status(), DeviceStatus::Stopped);
        assert!(device.model().empty());
        assert!(!device.is_started());
        assert_eq!(device.remote().subscriber_count(), 0);
    }

    #[test]
    fn ignores_remote_before_start() {
        let remote = RemoteDevice::new("plc");
        let device = Device::new(remote.clone());

        remote.connect();
        assert_eq!(device.status(), DeviceStatus::Stopped);
        assert!(device.model().empty());

        remote.disconnect();
        remote.connect();
        assert_eq!(device.status(), DeviceStatus::Stopped);
        assert!(device.model().empty());
    }

    #[test]
    fn start_samples_connected_remote() {
        let remote = RemoteDevice::new("plc");
        let device = Device::new(remote.clone());

        remote.connect();
        device.start().unwrap();

        assert_eq!(device.status(), DeviceStatus::Connected);
        assert!(device.model().loaded());
        assert!(device.is_started());
    }

    #[test]
    fn start_samples_disconnected_remote() {
        let device = Device::new(RemoteDevice::new("plc"));
        device.start().unwrap();

        assert_eq!(device.status(), DeviceStatus::Disconnected);
        assert!(device.model().empty());
    }

    #[test]
    fn second_start_fails() {
        let device = Device::new(RemoteDevice::new("plc"));
        device.start().unwrap();

        assert_eq!(device.start(), Err(DeviceError::AlreadyStarted { name: "plc".to_string() }));
        assert_eq!(device.remote().subscriber_count(), 1);
    }

    #[test]
    fn mirrors_alternating_transitions() {
        let remote = RemoteDevice::new("plc");
        let device = Device::new(remote.clone());
        device.start().unwrap();

        for _ in 0..5 {
            remote.connect();
            assert_eq!(device.status(), DeviceStatus::Connected);
            assert_consistent(&device);

            remote.disconnect();
            assert_eq!(device.status(), DeviceStatus::Disconnected);
            assert_consistent(&device);
        }

        assert_eq!(device.model().load_count(), 5);
    }

    #[test]
    fn repeated_connect_does_not_reload_model() {
        let remote = RemoteDevice::new("plc");
        let device = Device::new(remote.clone());
        device.start().unwrap();

        remote.connect();
        remote.connect();
        assert_eq!(device.model().load_count(), 1);
    }

    #[test]
    fn publishes_status_changes() {
        let remote = RemoteDevice::new("plc");
        let (sender, mut receiver) = channel(8);
        let device = Device::with_senders(remote.clone(), vec![sender]);

        remote.connect();
        device.start().unwrap();
        remote.disconnect();

        assert_eq!(receiver.try_next().unwrap(), Some(DeviceEvent::StatusChange(DeviceStatus::Connected)));
        assert_eq!(receiver.try_next().unwrap(), Some(DeviceEvent::StatusChange(DeviceStatus::Disconnected)));
        assert!(receiver.try_next().is_err());
    }

    #[test]
    fn closed_senders_are_forgotten() {
        let remote = RemoteDevice::new("plc");
        let (sender, receiver) = channel(8);
        let device = Device::with_senders(remote.clone(), vec![sender]);
        drop(receiver);

        device.start().unwrap();
        remote.connect();

        assert!(device.lock().senders.is_empty());
    }

    #[test]
    fn dropping_device_unsubscribes() {
        let remote = RemoteDevice::new("plc");
        let device = Device::new(remote.clone());
        device.start().unwrap();
        assert_eq!(remote.subscriber_count(), 1);

        drop(device);
        assert_eq!(remote.subscriber_count(), 0);
        remote.connect();
    }
}
