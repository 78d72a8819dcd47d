//! Shared helpers for command handlers.

use std::path::Path;

use serde_json::{Map, Value};

use profiled_core::Fingerprint;

use crate::cli::FieldArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Parse an optional `--etag` value.
pub fn parse_etag(raw: Option<&str>) -> Result<Option<Fingerprint>, CliError> {
    raw.map(str::parse::<Fingerprint>)
        .transpose()
        .map_err(CliError::from)
}

/// Split `key=value`.
pub fn parse_kv(raw: &str) -> Result<(String, String), CliError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: "set".into(),
        reason: format!("expected key=value, got '{raw}'"),
    })?;
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("empty key in '{raw}'"),
        });
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Split `name:key=value,key=value`.
pub fn parse_device(raw: &str) -> Result<(String, Map<String, Value>), CliError> {
    let (name, attrs) = raw.split_once(':').ok_or_else(|| CliError::Validation {
        field: "device".into(),
        reason: format!("expected name:key=value,..., got '{raw}'"),
    })?;
    let mut out = Map::new();
    for pair in attrs.split(',').filter(|p| !p.is_empty()) {
        let (key, value) = parse_kv(pair).map_err(|_| CliError::Validation {
            field: "device".into(),
            reason: format!("bad attribute '{pair}' in '{raw}'"),
        })?;
        out.insert(key, Value::String(value));
    }
    Ok((name.to_owned(), out))
}

/// Build a raw profile document from `--from-file` plus field flags.
///
/// Flags only add keys: `--set` merges into `config`, `--device` into
/// `devices`, `--description` replaces `description`. Keys the caller
/// never mentioned stay absent.
pub fn field_document(args: &FieldArgs) -> Result<Map<String, Value>, CliError> {
    let mut doc = match args.from_file {
        Some(ref path) => match read_json_file(path)? {
            Value::Object(map) => map,
            _ => {
                return Err(CliError::Validation {
                    field: "from-file".into(),
                    reason: "expected a JSON object".into(),
                });
            }
        },
        None => Map::new(),
    };

    if let Some(ref description) = args.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }

    if !args.set.is_empty() {
        let config = object_entry(&mut doc, "config")?;
        for raw in &args.set {
            let (key, value) = parse_kv(raw)?;
            config.insert(key, Value::String(value));
        }
    }

    if !args.devices.is_empty() {
        let devices = object_entry(&mut doc, "devices")?;
        for raw in &args.devices {
            let (name, attrs) = parse_device(raw)?;
            devices.insert(name, Value::Object(attrs));
        }
    }

    Ok(doc)
}

fn object_entry<'a>(
    doc: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, CliError> {
    let entry = doc
        .entry(key.to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    if entry.is_null() {
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut().ok_or_else(|| CliError::Validation {
        field: key.into(),
        reason: "expected a JSON object".into(),
    })
}
