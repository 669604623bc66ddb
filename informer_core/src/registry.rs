//! The process-wide active logger and the free functions forwarding to it.
//!
//! Installation is a single write-locked assignment. Forwarding calls clone
//! the active handle under a read lock and log after releasing it, so every
//! record is written by exactly one engine. Re-initialization is allowed and
//! the last writer wins; the replaced engine is flushed.

use crate::config::Configuration;
use crate::engine::EngineKind;
use crate::{Error, Fields, LoggerHandle, Result};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::{PoisonError, RwLock};

static ACTIVE: Lazy<RwLock<Option<LoggerHandle>>> = Lazy::new(|| RwLock::new(None));

const UNINITIALIZED: &str = "informer: logging used before init()";

/// Resolve `config`, build the selected engine and install it.
///
/// An unknown selector returns [`Error::InvalidLoggerInstance`]; an engine
/// construction failure is returned unchanged. In both cases the previously
/// installed logger stays active.
pub fn init<E>(config: Configuration, engine: E) -> Result<()>
where
    E: TryInto<EngineKind>,
    Error: From<E::Error>,
{
    let kind = engine.try_into()?;
    let resolved = config.resolve();
    let logger = kind.build(&resolved)?;
    tracing::debug!(engine = ?kind, "installing logger");
    set_logger(logger);
    Ok(())
}

/// Install a caller-built logger as the active handle
pub fn set_logger(logger: LoggerHandle) {
    let previous = ACTIVE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(logger);

    if let Some(previous) = previous {
        let _ = previous.flush();
    }
}

/// Whether a logger has been installed
pub fn is_initialized() -> bool {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// The active handle.
///
/// # Panics
/// If no logger has been installed yet.
pub fn logger() -> LoggerHandle {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .expect(UNINITIALIZED)
}

pub fn debug(args: fmt::Arguments<'_>) {
    logger().debug(args);
}

pub fn info(args: fmt::Arguments<'_>) {
    logger().info(args);
}

pub fn warn(args: fmt::Arguments<'_>) {
    logger().warn(args);
}

pub fn error(args: fmt::Arguments<'_>) {
    logger().error(args);
}

/// Log at fatal severity, flush, and exit the process with status 1
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    logger().fatal(args)
}

/// Log at panic severity, then panic with the message
pub fn panic(args: fmt::Arguments<'_>) -> ! {
    logger().panic(args)
}

/// A derived handle attaching `fields` to every record; the active handle
/// is left as is.
pub fn with_fields(fields: impl Into<Fields>) -> LoggerHandle {
    logger().with_fields(fields.into())
}

/// Flush the active logger's sinks
pub fn flush() -> Result<()> {
    logger().flush()
}

#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => { $crate::debug(::std::format_args!($($arg)+)) };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => { $crate::info(::std::format_args!($($arg)+)) };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => { $crate::warn(::std::format_args!($($arg)+)) };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => { $crate::error(::std::format_args!($($arg)+)) };
}

#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => { $crate::fatal(::std::format_args!($($arg)+)) };
}

#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => { $crate::panic(::std::format_args!($($arg)+)) };
}
