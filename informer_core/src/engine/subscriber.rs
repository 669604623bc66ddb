//! Engine built on `tracing` and `tracing-subscriber`.
//!
//! Each [`TracingLogger`] owns a private [`Dispatch`] holding one `fmt`
//! layer per enabled sink. Records are emitted with [`dispatcher::with_default`]
//! so the host's global subscriber (if any) never sees them and several
//! engines can coexist in one process.

use super::Record;
use crate::config::ResolvedConfiguration;
use crate::{Fields, Level, Logger, LoggerHandle, Result};
use chrono::{SecondsFormat, Utc};
use fs2::FileExt;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::dispatcher::{self, Dispatch};
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

const TARGET_DEBUG: &str = "informer::debug";
const TARGET_INFO: &str = "informer::info";
const TARGET_WARN: &str = "informer::warn";
const TARGET_ERROR: &str = "informer::error";
const TARGET_PANIC: &str = "informer::panic";
const TARGET_FATAL: &str = "informer::fatal";

/// Keys every JSON record starts with
const RESERVED_KEYS: [&str; 3] = ["level", "ts", "msg"];

/// Console and file engine.
#[derive(Clone)]
pub struct TracingLogger {
    dispatch: Dispatch,
    file: Option<Arc<File>>,
    fields: Fields,
    /// `fields` pre-rendered as a JSON object, empty when there are none
    rendered_fields: Arc<str>,
}

impl fmt::Debug for TracingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingLogger")
            .field("file", &self.file.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

impl TracingLogger {
    /// Build an engine writing its console sink to stdout
    pub fn new(config: &ResolvedConfiguration) -> Result<Self> {
        Self::build(config, BoxMakeWriter::new(io::stdout))
    }

    /// Build an engine whose console sink goes to `writer` instead of stdout
    pub fn with_console_writer<W>(config: &ResolvedConfiguration, writer: W) -> Result<Self>
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::build(config, BoxMakeWriter::new(writer))
    }

    fn build(config: &ResolvedConfiguration, console: BoxMakeWriter) -> Result<Self> {
        let file = if config.enable_file {
            Some(Arc::new(open_append(&config.file_location)?))
        } else {
            None
        };

        let console_layer = config.enable_console.then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(RecordFormat {
                    json: config.console_json_format,
                })
                .with_writer(console)
                .with_filter(filter_fn(admits(config.console_level)))
        });

        let file_layer = file.as_ref().map(|file| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(RecordFormat {
                    json: config.file_json_format,
                })
                .with_writer(LockedFile {
                    file: Arc::clone(file),
                })
                .with_filter(filter_fn(admits(config.file_level)))
        });

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            file,
            fields: Fields::new(),
            rendered_fields: Arc::from(""),
        })
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        // Format outside the dispatch: a Display impl may log on its own
        let message = args.to_string();
        dispatcher::with_default(&self.dispatch, || {
            emit(level, &message, &self.rendered_fields)
        });
    }

    fn with_fields(&self, fields: Fields) -> LoggerHandle {
        let fields = self.fields.merged(fields);
        let rendered = if fields.is_empty() {
            String::new()
        } else {
            Value::Object(fields.to_json_map()).to_string()
        };
        Arc::new(TracingLogger {
            dispatch: self.dispatch.clone(),
            file: self.file.clone(),
            fields,
            rendered_fields: Arc::from(rendered),
        })
    }

    fn flush(&self) -> Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &self.file {
            file.sync_data()?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn emit(level: Level, message: &str, fields: &str) {
    use tracing::Level as T;
    match level {
        Level::Debug => tracing::event!(target: TARGET_DEBUG, T::DEBUG, fields = fields, "{}", message),
        Level::Info => tracing::event!(target: TARGET_INFO, T::INFO, fields = fields, "{}", message),
        Level::Warn => tracing::event!(target: TARGET_WARN, T::WARN, fields = fields, "{}", message),
        Level::Error => tracing::event!(target: TARGET_ERROR, T::ERROR, fields = fields, "{}", message),
        Level::Panic => tracing::event!(target: TARGET_PANIC, T::ERROR, fields = fields, "{}", message),
        Level::Fatal => tracing::event!(target: TARGET_FATAL, T::ERROR, fields = fields, "{}", message),
    }
}

/// Recover the record level from an event target; `None` for foreign events
fn level_of(target: &str) -> Option<Level> {
    match target {
        TARGET_DEBUG => Some(Level::Debug),
        TARGET_INFO => Some(Level::Info),
        TARGET_WARN => Some(Level::Warn),
        TARGET_ERROR => Some(Level::Error),
        TARGET_PANIC => Some(Level::Panic),
        TARGET_FATAL => Some(Level::Fatal),
        _ => None,
    }
}

/// Per-sink filter: only our own events, at or above `min`
fn admits(min: Level) -> impl Fn(&Metadata<'_>) -> bool + Send + Sync + 'static {
    move |metadata: &Metadata<'_>| level_of(metadata.target()).is_some_and(|level| level >= min)
}

/// Collects the message and the pre-rendered fields of one event
#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: Fields,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "fields" => {
                if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(value) {
                    self.fields = map.into_iter().collect();
                }
            }
            name => {
                self.fields.insert(name, value);
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            name => {
                self.fields.insert(name, format!("{:?}", value));
            }
        }
    }
}

/// Event formatter shared by both sinks
struct RecordFormat {
    json: bool,
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let Some(level) = level_of(event.metadata().target()) else {
            return Ok(());
        };

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let record = Record {
            level,
            message: visitor.message,
            fields: visitor.fields,
        };

        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let line = if self.json {
            render_json(&record, &ts)
        } else {
            render_text(&record, &ts)
        };
        writeln!(writer, "{}", line)
    }
}

/// `{"level":..,"ts":..,"msg":..,<fields>}`.
///
/// Fields whose key clashes with a reserved key are written as `fields.<key>`,
/// prefixed again until the name is free.
fn render_json(record: &Record, ts: &str) -> String {
    let mut taken: HashSet<String> = RESERVED_KEYS.iter().map(|k| k.to_string()).collect();
    taken.extend(record.fields.iter().map(|(k, _)| k.clone()));

    let mut line = String::from("{");
    push_pair(&mut line, "level", &Value::from(record.level.as_str()));
    line.push(',');
    push_pair(&mut line, "ts", &Value::from(ts));
    line.push(',');
    push_pair(&mut line, "msg", &Value::from(record.message.as_str()));

    for (key, value) in record.fields.iter() {
        let key = if RESERVED_KEYS.contains(&key.as_str()) {
            let mut renamed = format!("fields.{}", key);
            while taken.contains(&renamed) {
                renamed = format!("fields.{}", renamed);
            }
            taken.insert(renamed.clone());
            renamed
        } else {
            key.clone()
        };
        line.push(',');
        push_pair(&mut line, &key, value);
    }
    line.push('}');
    line
}

fn push_pair(line: &mut String, key: &str, value: &Value) {
    line.push_str(&Value::from(key).to_string());
    line.push(':');
    line.push_str(&value.to_string());
}

/// `ts<TAB>LEVEL<TAB>msg[<TAB>{fields}]`
fn render_text(record: &Record, ts: &str) -> String {
    let mut line = format!("{}\t{}\t{}", ts, record.level.label(), record.message);
    if !record.fields.is_empty() {
        line.push('\t');
        line.push_str(&Value::Object(record.fields.to_json_map()).to_string());
    }
    line
}

/// File sink writer; holds an exclusive advisory lock for each record
struct LockedFile {
    file: Arc<File>,
}

struct LockedFileGuard<'a> {
    file: &'a File,
    locked: bool,
}

impl<'a> MakeWriter<'a> for LockedFile {
    type Writer = LockedFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        let locked = self.file.lock_exclusive().is_ok();
        LockedFileGuard {
            file: &self.file,
            locked,
        }
    }
}

impl Write for LockedFileGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for LockedFileGuard<'_> {
    fn drop(&mut self) {
        if self.locked {
            let _ = self.file.unlock();
        }
    }
}
