//! The logger capability every engine implements.

use crate::{Fields, Level, Result};
use std::fmt;
use std::sync::Arc;

/// A shareable logger handle
pub type LoggerHandle = Arc<dyn Logger>;

/// Capability set of a logging engine.
///
/// Engines implement [`Logger::log`] and [`Logger::with_fields`]; the leveled
/// methods are provided on top of them.
pub trait Logger: Send + Sync {
    /// Write one record at `level` to every sink that admits it
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    /// A new handle that attaches `fields` to every record it writes.
    /// `self` is left untouched.
    fn with_fields(&self, fields: Fields) -> LoggerHandle;

    /// Flush buffered output to the sinks
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    /// Log, flush and terminate the process with status 1
    fn fatal(&self, args: fmt::Arguments<'_>) -> ! {
        self.log(Level::Fatal, args);
        let _ = self.flush();
        std::process::exit(1)
    }

    /// Log, flush and unwind with the message as payload
    fn panic(&self, args: fmt::Arguments<'_>) -> ! {
        let message = args.to_string();
        self.log(Level::Panic, format_args!("{}", message));
        let _ = self.flush();
        std::panic::panic_any(message)
    }
}
