//! touchline-core: the game-state engine of a football management career.
//!
//! The engine owns one `Career` aggregate and applies host actions to it
//! atomically; see `engine.rs` for the execution order.

pub mod career;
pub mod clock;
pub mod command;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod event;
pub mod finance;
pub mod handle;
pub mod inbox;
pub mod league_table;
pub mod match_engine;
pub mod name_generator;
pub mod rng;
pub mod scheduler;
pub mod scouting;
pub mod season;
pub mod snapshot;
pub mod store;
pub mod subsystem;
pub mod transfer_market;
pub mod types;
pub mod world;

pub use career::Career;
pub use config::CareerConfig;
pub use engine::{CareerEngine, MatchProgress};
pub use error::{CareerError, CareerResult, ErrorKind};
pub use handle::CareerHandle;
pub use store::CareerStore;
