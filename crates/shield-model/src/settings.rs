//! # Processing Windows
//!
//! Timing defaults attached to tickets and ticket items at construction.
//! Values are seconds. Defaults can be overridden from a YAML document and
//! then from environment variables:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `SHIELD_TICKET_AUTOCLOSE_TIME` | `ticket.autoclose_time` | 1875 |
//! | `SHIELD_TICKET_REVOKE_TIME` | `ticket.revoke_time` | 75 |
//! | `SHIELD_TICKET_REPORT_ERROR_TIME` | `ticket.report_error_time` | 86400 |
//! | `SHIELD_TICKET_ITEM_UPDATE_MAX_TIME` | `ticket_item.update_max_time` | 172800 |

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ticket processing windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TicketSettings {
    /// Seconds after creation before the ticket closes on its own.
    pub autoclose_time: u64,
    /// Seconds after creation during which the reporter may revoke it.
    pub revoke_time: u64,
    /// Seconds after creation during which an error report may be filed.
    pub report_error_time: u64,
}

impl Default for TicketSettings {
    fn default() -> Self {
        Self {
            autoclose_time: 1875,
            revoke_time: 75,
            report_error_time: 86400,
        }
    }
}

impl TicketSettings {
    /// Reject zero windows and a revoke window that outlives the ticket.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_zero("ticket.autoclose_time", self.autoclose_time)?;
        non_zero("ticket.revoke_time", self.revoke_time)?;
        non_zero("ticket.report_error_time", self.report_error_time)?;
        if self.revoke_time >= self.autoclose_time {
            return Err(ConfigError::RevokeAfterAutoclose {
                revoke_time: self.revoke_time,
                autoclose_time: self.autoclose_time,
            });
        }
        Ok(())
    }
}

/// Ticket item processing windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TicketItemSettings {
    /// Seconds a provider has to report on an item.
    pub update_max_time: u64,
}

impl Default for TicketItemSettings {
    fn default() -> Self {
        Self {
            update_max_time: 172800,
        }
    }
}

impl TicketItemSettings {
    /// Reject a zero window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_zero("ticket_item.update_max_time", self.update_max_time)
    }
}

/// All processing windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    /// Applied to every ticket.
    pub ticket: TicketSettings,
    /// Applied to every ticket item.
    pub ticket_item: TicketItemSettings,
}

impl ModelSettings {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&text)
    }

    /// Defaults overridden by any `SHIELD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `SHIELD_*` environment overrides on top of these settings.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let fields: [(&str, &mut u64); 4] = [
            ("SHIELD_TICKET_AUTOCLOSE_TIME", &mut self.ticket.autoclose_time),
            ("SHIELD_TICKET_REVOKE_TIME", &mut self.ticket.revoke_time),
            ("SHIELD_TICKET_REPORT_ERROR_TIME", &mut self.ticket.report_error_time),
            ("SHIELD_TICKET_ITEM_UPDATE_MAX_TIME", &mut self.ticket_item.update_max_time),
        ];
        for (var, slot) in fields {
            if let Some(raw) = lookup(var) {
                *slot = raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                    var: var.to_string(),
                    value: raw.clone(),
                })?;
                tracing::debug!(var, value = *slot, "settings override applied");
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ticket.validate()?;
        self.ticket_item.validate()
    }
}

fn non_zero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroWindow(field))
    } else {
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The document is not valid settings YAML.
    #[error("invalid settings YAML: {0}")]
    Yaml(String),
    /// The settings file could not be read.
    #[error("cannot read settings file {path}: {reason}")]
    Io {
        /// File that was read.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },
    /// An override variable is not an unsigned integer.
    #[error("environment variable {var} is not a number of seconds: {value:?}")]
    InvalidVar {
        /// Variable name.
        var: String,
        /// Rejected value.
        value: String,
    },
    /// A window is zero seconds.
    #[error("{0} must be greater than zero")]
    ZeroWindow(&'static str),
    /// The revoke window does not end before the ticket closes.
    #[error("revoke_time ({revoke_time}s) must be shorter than autoclose_time ({autoclose_time}s)")]
    RevokeAfterAutoclose {
        /// Configured revoke window.
        revoke_time: u64,
        /// Configured autoclose window.
        autoclose_time: u64,
    },
}
