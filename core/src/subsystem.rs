//! Subsystem trait.
//!
//! RULE: Every time-driven effect implements CareerSubsystem.
//! The engine calls on_tick() on each registered subsystem in
//! registration order whenever the career tick moves (matchday
//! advance or season rollover). Nothing runs on a wall-clock timer.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    career::Career,
    config::CareerConfig,
    error::CareerResult,
    event::CareerEvent,
    rng::{RngSlot, SimRng},
};

/// Why the tick moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Matchday,
    SeasonRollover,
}

/// The contract every subsystem must fulfill.
pub trait CareerSubsystem: Send + Sync {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// The RNG stream this subsystem draws from.
    fn slot(&self) -> RngSlot;

    /// Called once per tick by the engine, on the working copy of the
    /// career. An error aborts the whole action; nothing is published.
    fn on_tick(
        &self,
        career: &mut Career,
        config: &CareerConfig,
        kind:   TickKind,
        rng:    &mut SimRng,
    ) -> CareerResult<Vec<CareerEvent>>;
}
