//! Shared access to one career from several threads.
//!
//! One writer at a time: every action takes the lock for its duration.
//! Readers take a snapshot (an Arc clone) and release the lock at once.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    command::{Command, CommandOutcome},
    engine::CareerEngine,
    error::{CareerError, CareerResult},
    snapshot::CareerSnapshot,
};

#[derive(Clone)]
pub struct CareerHandle {
    engine: Arc<Mutex<CareerEngine>>,
}

impl CareerHandle {
    pub fn new(engine: CareerEngine) -> Self {
        Self { engine: Arc::new(Mutex::new(engine)) }
    }

    pub fn snapshot(&self) -> CareerResult<CareerSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    pub fn dispatch(&self, command: Command) -> CareerResult<CommandOutcome> {
        self.lock()?.dispatch(command)
    }

    /// Run several engine calls under one lock.
    pub fn with<T>(&self, f: impl FnOnce(&mut CareerEngine) -> CareerResult<T>) -> CareerResult<T> {
        let mut engine = self.lock()?;
        f(&mut engine)
    }

    fn lock(&self) -> CareerResult<MutexGuard<'_, CareerEngine>> {
        self.engine
            .lock()
            .map_err(|_| CareerError::Other(anyhow::anyhow!("career engine lock poisoned")))
    }
}
