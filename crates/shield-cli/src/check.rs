//! # Check Subcommand
//!
//! Builds one record from a JSON or YAML payload and prints its exported
//! attributes. A payload that fails validation prints the field-specific
//! error and exits with status 1; unreadable input is an operational error.
//!
//! ```bash
//! shield check ticket ticket.json --settings windows.yaml
//! shield check whitelist --all < entry.json
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use shield_model::{ModelError, ModelSettings};

use crate::entity::EntityKind;

/// Arguments for the `shield check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Record type of the payload.
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Payload file (.json, .yaml or .yml). Reads standard input when omitted.
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// YAML file overriding the ticket and ticket item processing windows.
    #[arg(long, value_name = "YAML")]
    pub settings: Option<PathBuf>,

    /// Report every failing field instead of stopping at the first.
    #[arg(long)]
    pub all: bool,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the record is valid, 1 when it is rejected.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let payload = load_payload(args.path.as_deref())?;
    tracing::debug!(entity = ?args.entity, all = args.all, "checking payload");

    if args.all {
        let errors = match args.entity.audit(payload) {
            Ok(errors) => errors,
            Err(e) => return Ok(reject(&e)),
        };
        if errors.is_empty() {
            println!("OK");
            return Ok(0);
        }
        for error in &errors {
            println!("FAIL: {error}");
        }
        println!("\n{} field(s) failed validation.", errors.len());
        return Ok(1);
    }

    let settings = load_settings(args.settings.as_deref())?;
    match args.entity.build(payload, &settings) {
        Ok(attributes) => {
            let json = serde_json::to_string_pretty(&attributes)
                .context("failed to render exported attributes")?;
            println!("{json}");
            Ok(0)
        }
        Err(e) => Ok(reject(&e)),
    }
}

fn reject(error: &ModelError) -> u8 {
    println!("FAIL: {error}");
    1
}

/// Read a payload from `path`, or from standard input when `None`.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON.
pub fn load_payload(path: Option<&Path>) -> Result<Value> {
    let (text, yaml) = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let yaml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
            (text, yaml)
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read payload from standard input")?;
            (text, false)
        }
    };

    if yaml {
        serde_yaml::from_str(&text).context("payload is not valid YAML")
    } else {
        serde_json::from_str(&text).context("payload is not valid JSON")
    }
}

/// Processing windows from `path` when given, defaults otherwise, with
/// `SHIELD_*` environment overrides applied last.
pub fn load_settings(path: Option<&Path>) -> Result<ModelSettings> {
    let settings = match path {
        Some(path) => ModelSettings::from_yaml_file(path)?.with_env_overrides()?,
        None => ModelSettings::from_env()?,
    };
    tracing::debug!(?settings, "processing windows loaded");
    Ok(settings)
}
