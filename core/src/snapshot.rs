//! Snapshots and save documents.
//!
//! A snapshot is an immutable `Arc<Career>` published after every committed
//! action. A save document is the full Career aggregate as one JSON value;
//! loading it reproduces a Career equal to the one saved, including any
//! match in progress and its RNG position.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    career::Career,
    error::{CareerError, CareerResult},
};

/// Bumped whenever the document layout changes incompatibly.
pub const SAVE_SCHEMA_VERSION: u32 = 1;

/// A read-only view of the career at one point in time.
pub type CareerSnapshot = Arc<Career>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    pub schema_version: u32,
    pub career:         Career,
}

impl SaveDocument {
    pub fn new(career: &Career) -> Self {
        Self { schema_version: SAVE_SCHEMA_VERSION, career: career.clone() }
    }

    pub fn to_json(&self) -> CareerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> CareerResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        if doc.schema_version != SAVE_SCHEMA_VERSION {
            return Err(CareerError::InvalidInput(format!(
                "save schema {} is not supported (expected {SAVE_SCHEMA_VERSION})",
                doc.schema_version
            )));
        }
        Ok(doc)
    }
}
