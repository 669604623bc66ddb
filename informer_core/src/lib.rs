#![forbid(unsafe_code)]

//! Process-wide structured logging facade.
//!
//! This crate provides:
//! - A configuration with documented defaults for a console and a file sink
//! - The [`Logger`] capability every engine implements
//! - A `tracing-subscriber` backed engine
//! - One global active logger, installed with [`init`], plus the
//!   `debugf!`..`panicf!` macros and [`with_fields`] that forward to it
//!
//! ```no_run
//! use informer_core::{fields, infof, Configuration, EngineKind, Level};
//!
//! let config = Configuration::new().console_level(Level::Info).enable_file(false);
//! informer_core::init(config, EngineKind::Tracing)?;
//!
//! infof!("listening on {}", 8080);
//! informer_core::with_fields(fields! { "peer" => "10.0.0.7" })
//!     .warn(format_args!("slow handshake"));
//! # Ok::<(), informer_core::Error>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod fields;
pub mod level;
pub mod logger;
pub mod registry;

// Re-export commonly used types
pub use config::{Configuration, ResolvedConfiguration};
pub use engine::{EngineKind, MemoryLogger, Record, TracingLogger};
pub use error::{Error, Result};
pub use fields::Fields;
pub use level::Level;
pub use logger::{Logger, LoggerHandle};
pub use registry::{
    debug, error, fatal, flush, info, init, is_initialized, logger, panic, set_logger, warn,
    with_fields,
};
