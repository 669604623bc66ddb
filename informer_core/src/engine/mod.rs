//! Concrete logging engines and the selector used to pick one.

mod memory;
mod subscriber;

pub use self::memory::MemoryLogger;
pub use self::subscriber::TracingLogger;

use crate::config::ResolvedConfiguration;
use crate::{Error, Fields, Level, LoggerHandle, Result};
use std::sync::Arc;

/// Engine selector passed to [`crate::init`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EngineKind {
    /// `tracing-subscriber` backed console + file engine
    Tracing = 0,
}

impl EngineKind {
    /// Build the engine for an already resolved configuration
    pub fn build(self, config: &ResolvedConfiguration) -> Result<LoggerHandle> {
        match self {
            EngineKind::Tracing => Ok(Arc::new(TracingLogger::new(config)?)),
        }
    }
}

impl TryFrom<i32> for EngineKind {
    type Error = Error;

    fn try_from(selector: i32) -> Result<Self> {
        match selector {
            0 => Ok(EngineKind::Tracing),
            other => Err(Error::InvalidLoggerInstance(other)),
        }
    }
}

impl From<EngineKind> for i32 {
    fn from(kind: EngineKind) -> i32 {
        kind as i32
    }
}

/// One log record as handed to a sink
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}
