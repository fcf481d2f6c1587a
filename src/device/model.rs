use log::debug;

/// The data model owned by a `Device`. It is loaded while the remote device is connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Model {
    loaded: bool,
    load_count: u64,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    pub fn empty(&self) -> bool {
        !self.loaded
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Number of times the model went from empty to loaded.
    pub fn load_count(&self) -> u64 {
        self.load_count
    }

    pub(crate) fn load(&mut self) {
        if self.loaded {
            return;
        }

        self.loaded = true;
        self.load_count += 1;
        debug!("Model loaded (load #{})", self.load_count);
    }

    pub(crate) fn unload(&mut self) {
        if !self.loaded {
            return;
        }

        self.loaded = false;
        debug!("Model unloaded");
    }
}
