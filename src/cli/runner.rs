//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::SchemaConfig;
use crate::error::{Error, Result, ResultExt};
use crate::schema::{property_names_at_path_with_id, Schema};
use crate::session::SchemaSession;
use serde_json::{json, Value};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Session key used when reading from stdin
const STDIN_KEY: &str = "<stdin>";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let input = self.read_input()?;

        match &self.cli.command {
            Commands::Infer { limit } => {
                let schema = self.analyze(&config, &input, *limit)?;
                self.output_message(&schema.to_json()?)?;
            }
            Commands::Fields { path } => {
                let schema = self.analyze(&config, &input, None)?;
                let segments = split_path(path.as_deref());
                let names = property_names_at_path_with_id(&schema, &segments, &config.id_field);
                self.output_message(&json!(names))?;
            }
            Commands::Show { path } => {
                let schema = self.analyze(&config, &input, None)?;
                let segments = split_path(path.as_deref());
                let node = schema.schema_at_path(&segments)?;
                self.output_message(&serde_json::to_value(node)?)?;
            }
        }

        Ok(())
    }

    /// Load the config file if given, then apply command-line overrides
    fn load_config(&self) -> Result<SchemaConfig> {
        let mut config = match &self.cli.config {
            Some(path) => SchemaConfig::from_file(path)?,
            None => SchemaConfig::default(),
        };

        if let Some(format) = self.cli.format {
            config.format = format;
        }
        if let Some(record_path) = &self.cli.record_path {
            config.record_path = Some(record_path.clone());
        }

        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Read the whole input, from the file or stdin
    fn read_input(&self) -> Result<String> {
        match &self.cli.input {
            Some(path) => read_file(path),
            None => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read stdin")?;
                Ok(buffer)
            }
        }
    }

    /// Decode the input and merge it into a fresh schema
    fn analyze(&self, config: &SchemaConfig, input: &str, limit: Option<u64>) -> Result<Schema> {
        let key = self
            .cli
            .input
            .as_ref()
            .map_or_else(|| STDIN_KEY.to_string(), |p| p.display().to_string());
        build_schema(config, &key, input, limit)
    }

    /// Print a JSON message to stdout
    fn output_message(&self, msg: &Value) -> Result<()> {
        println!("{}", render(msg, self.cli.output)?);
        Ok(())
    }
}

/// Decode `input` and merge the documents, honouring the tightest of the
/// configured cap and `limit`
fn build_schema(
    config: &SchemaConfig,
    key: &str,
    input: &str,
    limit: Option<u64>,
) -> Result<Schema> {
    let documents = config.decoder_config().build().decode(input)?;

    let cap = match (config.max_documents, limit) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let mut session = SchemaSession::with_max_documents(cap);
    for document in &documents {
        session.observe(key, document);
        if session.is_capped() {
            break;
        }
    }

    info!(
        key,
        decoded = documents.len(),
        inspected = session.documents_inspected(),
        "schema inferred"
    );
    Ok(session.take())
}

/// Serialize a message in the requested output format
fn render(msg: &Value, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(msg)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
    };
    Ok(text)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })
}

/// Split a dotted field path, root when absent or empty
fn split_path(path: Option<&str>) -> Vec<&str> {
    path.map(|p| p.split('.').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecoderFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path(None), Vec::<&str>::new());
        assert_eq!(split_path(Some("")), Vec::<&str>::new());
        assert_eq!(split_path(Some("a.b.c")), vec!["a", "b", "c"]);
        assert_eq!(split_path(Some(".a..b")), vec!["a", "b"]);
    }

    #[test]
    fn test_build_schema_json_array() {
        let config = SchemaConfig::default();
        let input = r#"[{"a": 1}, {"a": 2, "b": "x"}]"#;

        let schema = build_schema(&config, "test", input, None).unwrap();
        assert_eq!(schema.documents_inspected(), 2);
        assert_eq!(schema.property("b").unwrap().occurrence(), 1);
    }

    #[test]
    fn test_build_schema_respects_tightest_cap() {
        let config = SchemaConfig {
            format: DecoderFormat::Jsonl,
            max_documents: Some(3),
            ..SchemaConfig::default()
        };
        let input = "{\"a\": 1}\n{\"a\": 2}\n{\"a\": 3}\n{\"a\": 4}\n";

        let schema = build_schema(&config, "test", input, None).unwrap();
        assert_eq!(schema.documents_inspected(), 3);

        let schema = build_schema(&config, "test", input, Some(2)).unwrap();
        assert_eq!(schema.documents_inspected(), 2);
    }

    #[test]
    fn test_build_schema_zero_limit_merges_nothing() {
        let config = SchemaConfig::default();
        let input = r#"[{"a": 1}, {"a": 2}]"#;

        let schema = build_schema(&config, "test", input, Some(0)).unwrap();
        assert_eq!(schema.documents_inspected(), 0);
        assert!(schema.properties().is_empty());
    }

    #[test]
    fn test_render_formats() {
        let msg = json!({"a": [1]});
        assert_eq!(render(&msg, OutputFormat::Json).unwrap(), r#"{"a":[1]}"#);
        assert_eq!(
            render(&msg, OutputFormat::Pretty).unwrap(),
            "{\n  \"a\": [\n    1\n  ]\n}"
        );
    }

    #[test]
    fn test_build_schema_decode_error() {
        let config = SchemaConfig::default();
        let err = build_schema(&config, "test", "{oops", None).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
