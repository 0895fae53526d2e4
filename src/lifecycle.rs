//! Process lifecycle: the shutdown request observed at loop boundaries.
//!
//! The control loop never cancels a measurement mid-flight.  A stop request
//! only raises a flag; the loop checks it between phases and then runs its
//! orderly shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to one shared stop flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop after the current phase.
    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::AcqRel) {
            log::info!("Shutdown requested");
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}
