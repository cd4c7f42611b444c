use crate::error::LoadError;
use crate::launcher::{EngineLauncher, LaunchParameters};
use std::sync::{Arc, Mutex};

/// Records every handoff instead of starting an engine.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    launched: Arc<Mutex<Vec<LaunchParameters>>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<LaunchParameters> {
        self.launched.lock().unwrap().clone()
    }
}

impl EngineLauncher for RecordingLauncher {
    fn launch(&self, params: LaunchParameters) -> Result<(), LoadError> {
        self.launched.lock().unwrap().push(params);
        Ok(())
    }
}
