//! Run configuration.
//!
//! Everything the orchestrator needs to know about a run lives in [`Config`],
//! built once from the command line and passed down explicitly.

use crate::cli::Cli;
use std::path::PathBuf;
use std::time::Duration;

/// Invitation text used when no `--message` is given.
pub const DEFAULT_TEMPLATE: &str = "Hola {representante} tenemos el agrado de invitar a tu club {club} al torneo Just Lift Alpha Cup Apertura 2026. Adjunta tienes la invitación formal, solo responde a este mensaje con las categorías en las que desean participar. ¡Saludos!";

pub const DEFAULT_COUNTRY_CODE: &str = "593";

pub const DEFAULT_FILES_DIR: &str = "invitaciones";

/// Column holding the phone number.
pub const PHONE_COLUMN: &str = "celular";

/// Column holding the per-contact attachment file name.
pub const FILE_COLUMN: &str = "dir";

/// Columns shown on the contact card when present.
pub const NAME_COLUMN: &str = "representante";
pub const CLUB_COLUMN: &str = "club";

#[derive(Debug, Clone)]
pub struct Config {
    /// Digits prefixed to numbers that lack them.
    pub country_code: String,
    /// Base directory joined with each contact's file name.
    pub files_dir: PathBuf,
    /// Message template with `{column}` placeholders.
    pub template: String,
    /// Shared attachment; when set the file column is ignored.
    pub attachment: Option<PathBuf>,
    pub open_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            files_dir: PathBuf::from(DEFAULT_FILES_DIR),
            template: DEFAULT_TEMPLATE.to_string(),
            attachment: None,
            open_delay: Duration::from_millis(1500),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            country_code: cli.country_code.trim().to_string(),
            files_dir: cli.files_dir.clone(),
            template: cli
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            attachment: cli.attachment.clone(),
            open_delay: Duration::from_millis(cli.open_delay_ms),
        }
    }

    /// Columns the input file must provide for this run.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut required = vec![PHONE_COLUMN];
        if self.attachment.is_none() {
            required.push(FILE_COLUMN);
        }
        required
    }
}
