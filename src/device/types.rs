use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Stopped,
    Connected,
    Disconnected,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            DeviceStatus::Stopped => "Stopped",
            DeviceStatus::Connected => "Connected",
            DeviceStatus::Disconnected => "Disconnected",
        };

        write!(f, "{}", result)
    }
}

/// Connection state of a remote device, as delivered to its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

impl From<bool> for ConnectionState {
    fn from(connected: bool) -> Self {
        if connected { ConnectionState::Connected } else { ConnectionState::Disconnected }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
        };

        write!(f, "{}", result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    StatusChange(DeviceStatus),
}
