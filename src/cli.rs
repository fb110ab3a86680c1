use crate::config::{DEFAULT_COUNTRY_CODE, DEFAULT_FILES_DIR};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Semi-manual WhatsApp sender: opens each contact's chat with a pre-filled message and puts the file on the clipboard.",
    after_help = "Examples:
  # Default template with per-contact files from the 'dir' column
  whatsend contacts.csv

  # Custom message for everyone, no attachment column needed
  whatsend contacts.csv -m \"Hola {representante}!\" -a flyer.jpg

  # See which {placeholders} the file offers
  whatsend contacts.xlsx --show-placeholders"
)]
pub struct Cli {
    /// CSV or XLSX file with one contact per row.
    #[arg(required = true)]
    pub data_file: PathBuf,

    /// Message template. Use {column} to insert a value from the contact's row.
    /// Defaults to the built-in invitation text.
    #[arg(short, long)]
    pub message: Option<String>,

    /// File sent to every contact. Overrides the 'dir' column.
    #[arg(short, long)]
    pub attachment: Option<PathBuf>,

    /// Directory holding the per-contact files named in the 'dir' column.
    #[arg(long, default_value = DEFAULT_FILES_DIR)]
    pub files_dir: PathBuf,

    /// Country code prefixed to local phone numbers (digits, optional leading '+').
    #[arg(long, default_value = DEFAULT_COUNTRY_CODE, value_parser = parse_country_code)]
    pub country_code: String,

    /// Milliseconds to wait after opening a chat so WhatsApp can come to the front.
    #[arg(long, default_value_t = 1500)]
    pub open_delay_ms: u64,

    /// Print the available {placeholders} with a sample value and exit.
    #[arg(long, default_value_t = false)]
    pub show_placeholders: bool,

    /// Print debug info about the loaded data and each platform call
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

/// Accepts `593` or `+593`, returning the bare digits.
fn parse_country_code(raw: &str) -> Result<String, String> {
    let digits = raw.trim();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(digits.to_string())
    } else {
        Err(format!("'{raw}' is not a country code (expected digits like 593)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_data_file_given() {
        let cli = Cli::parse_from(["whatsend", "contacts.csv"]);
        assert_eq!(cli.data_file, PathBuf::from("contacts.csv"));
        assert_eq!(cli.country_code, "593");
        assert_eq!(cli.files_dir, PathBuf::from("invitaciones"));
        assert_eq!(cli.open_delay_ms, 1500);
        assert!(cli.message.is_none());
        assert!(cli.attachment.is_none());
        assert!(!cli.show_placeholders);
    }

    #[test]
    fn short_flags_for_message_and_attachment() {
        let cli = Cli::parse_from(["whatsend", "c.xlsx", "-m", "Hi {club}", "-a", "flyer.jpg"]);
        assert_eq!(cli.message.as_deref(), Some("Hi {club}"));
        assert_eq!(cli.attachment, Some(PathBuf::from("flyer.jpg")));
    }

    #[test]
    fn country_code_plus_sign_is_stripped() {
        let cli = Cli::parse_from(["whatsend", "c.csv", "--country-code", "+34"]);
        assert_eq!(cli.country_code, "34");
    }

    #[test]
    fn country_code_must_be_digits() {
        for bad in ["59a", "", "+", "5 93", "++593"] {
            assert!(
                Cli::try_parse_from(["whatsend", "c.csv", "--country-code", bad]).is_err(),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn data_file_is_required() {
        assert!(Cli::try_parse_from(["whatsend"]).is_err());
    }
}
