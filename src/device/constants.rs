/**
 * Name used for the remote device when the config does not provide one.
 */
pub const DEFAULT_REMOTE_NAME: &str = "remote";

/**
 * Capacity of the channel that carries DeviceEvents to the command loop.
 * Events that do not fit are dropped with a warning.
 */
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/**
 * Largest eventBuffer accepted from the config file.
 */
pub const MAX_EVENT_BUFFER: usize = 65536;
