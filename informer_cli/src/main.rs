use clap::{Parser, Subcommand, ValueEnum};
use informer_core::*;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "informer")]
#[command(about = "Structured logging from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/informer/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one record through the configured sinks
    Emit {
        /// Record severity
        #[arg(long, value_enum, default_value_t = EmitLevel::Info)]
        level: EmitLevel,

        /// Structured field, KEY=VALUE (repeatable)
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        /// Engine selector
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        engine: i32,

        /// Message words, joined with spaces
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Print the resolved configuration as TOML
    Config,
}

/// Levels accepted on the command line. `panic` is left out: unwinding
/// out of `main` is never what a shell caller wants.
#[derive(Clone, Copy, ValueEnum)]
enum EmitLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

fn main() -> Result<()> {
    informer_core::diagnostics::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Configuration::load_from(path)?,
        None => Configuration::load()?,
    };

    match cli.command {
        Commands::Emit {
            level,
            fields,
            engine,
            message,
        } => cmd_emit(config, level, &fields, engine, &message.join(" ")),
        Commands::Config => cmd_config(config),
    }
}

fn cmd_emit(
    config: Configuration,
    level: EmitLevel,
    fields: &[String],
    engine: i32,
    message: &str,
) -> Result<()> {
    let fields = parse_fields(fields)?;
    informer_core::init(config, engine)?;

    let logger = if fields.is_empty() {
        informer_core::logger()
    } else {
        informer_core::with_fields(fields)
    };

    match level {
        EmitLevel::Debug => logger.debug(format_args!("{}", message)),
        EmitLevel::Info => logger.info(format_args!("{}", message)),
        EmitLevel::Warn => logger.warn(format_args!("{}", message)),
        EmitLevel::Error => logger.error(format_args!("{}", message)),
        EmitLevel::Fatal => logger.fatal(format_args!("{}", message)),
    }

    logger.flush()
}

fn cmd_config(config: Configuration) -> Result<()> {
    print!("{}", config.resolve().to_toml()?);
    Ok(())
}

/// Parse `KEY=VALUE` pairs. Values that are valid JSON keep their type,
/// anything else becomes a string.
fn parse_fields(pairs: &[String]) -> Result<Fields> {
    let mut fields = Fields::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("Field must be KEY=VALUE, got {:?}", pair)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::Config(format!("Field key is empty in {:?}", pair)));
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
        tracing::debug!("Parsed field {} = {}", key, value);
        fields.insert(key, value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_fields_typed_values() {
        let fields = parse_fields(&strings(&["n=3", "ok=true", "user=ana", "q=\"7\""])).unwrap();
        assert_eq!(fields.get("n"), Some(&json!(3)));
        assert_eq!(fields.get("ok"), Some(&json!(true)));
        assert_eq!(fields.get("user"), Some(&json!("ana")));
        assert_eq!(fields.get("q"), Some(&json!("7")));
    }

    #[test]
    fn test_parse_fields_value_may_contain_equals() {
        let fields = parse_fields(&strings(&["expr=a=b"])).unwrap();
        assert_eq!(fields.get("expr"), Some(&json!("a=b")));
    }

    #[test]
    fn test_parse_fields_rejects_missing_separator() {
        assert!(matches!(
            parse_fields(&strings(&["novalue"])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_fields(&strings(&["=v"])),
            Err(Error::Config(_))
        ));
    }
}
