//! Run identifiers.

use derive_more::Display;
use uuid::Uuid;

/// Identifier attached to one extraction run.
/// UUIDv7, so log lines from consecutive runs sort by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}
