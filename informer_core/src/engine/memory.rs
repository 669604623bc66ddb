//! In-memory engine that keeps every record, for tests and embedding.

use super::Record;
use crate::{Fields, Level, Logger, LoggerHandle};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Records everything at or above `min_level` into a shared buffer.
///
/// Handles derived through [`Logger::with_fields`] share the buffer.
#[derive(Clone, Debug)]
pub struct MemoryLogger {
    records: Arc<Mutex<Vec<Record>>>,
    fields: Fields,
    min_level: Level,
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_min_level(Level::Debug)
    }

    pub fn with_min_level(min_level: Level) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fields: Fields::new(),
            min_level,
        }
    }

    /// Snapshot of the records written so far
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages only, in write order
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if level < self.min_level {
            return;
        }
        let record = Record {
            level,
            message: args.to_string(),
            fields: self.fields.clone(),
        };
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    fn with_fields(&self, fields: Fields) -> LoggerHandle {
        Arc::new(MemoryLogger {
            records: Arc::clone(&self.records),
            fields: self.fields.merged(fields),
            min_level: self.min_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leveled_methods() {
        let logger = MemoryLogger::new();
        logger.debug(format_args!("d {}", 1));
        logger.info(format_args!("i"));
        logger.warn(format_args!("w"));
        logger.error(format_args!("e"));

        let levels: Vec<_> = logger.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![Level::Debug, Level::Info, Level::Warn, Level::Error]);
        assert_eq!(logger.messages()[0], "d 1");
    }

    #[test]
    fn test_min_level_drops_below() {
        let logger = MemoryLogger::with_min_level(Level::Warn);
        logger.info(format_args!("quiet"));
        logger.error(format_args!("loud"));
        assert_eq!(logger.messages(), vec!["loud".to_string()]);
    }

    #[test]
    fn test_with_fields_does_not_touch_parent() {
        let logger = MemoryLogger::new();
        let child = logger.with_fields(crate::fields! { "k" => "v" });
        let grandchild = child.with_fields(crate::fields! { "n" => 1 });

        child.info(format_args!("child"));
        grandchild.info(format_args!("grandchild"));
        logger.info(format_args!("parent"));

        let records = logger.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].fields.get("k"), Some(&json!("v")));
        assert!(records[0].fields.get("n").is_none());
        assert_eq!(records[1].fields.get("k"), Some(&json!("v")));
        assert_eq!(records[1].fields.get("n"), Some(&json!(1)));
        assert!(records[2].fields.is_empty());
    }

    #[test]
    fn test_panic_logs_then_unwinds() {
        let logger = MemoryLogger::new();
        let cloned = logger.clone();
        let result = std::panic::catch_unwind(move || cloned.panic(format_args!("boom {}", 7)));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("boom 7"));
        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Panic);
        assert_eq!(records[0].message, "boom 7");
    }
}
