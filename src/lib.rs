//! The main library for the `whatsend` application.
//!
//! This crate loads a contact spreadsheet and walks through it one contact at a
//! time: it opens the WhatsApp chat with a pre-filled message, puts the
//! contact's file on the clipboard, and waits for the operator before moving on.
//! The primary entry point is the `run` function, which takes the parsed CLI
//! arguments and executes the whole session.
//!
//! The library is structured into several modules:
//! - `cli`: Defines the command-line interface.
//! - `config`: The run configuration built from the CLI.
//! - `data_loader`: Reads CSV/XLSX files into contact records.
//! - `contacts`: Record and sheet types.
//! - `template`: `{column}` placeholder substitution.
//! - `attachment`: Per-contact or shared attachment resolution.
//! - `phone`: Phone number normalization.
//! - `platform`: Opening chats and copying files to the clipboard.
//! - `orchestrator`: The sequential per-contact loop.
//! - `report`: Console output for the operator.
//! - `error`: Defines the application's custom error type.

use anyhow::{Context, Result};
use std::io;
use tracing::{debug, warn};

pub mod attachment;
pub mod cli;
pub mod config;
pub mod contacts;
pub mod data_loader;
pub mod error;
pub mod orchestrator;
pub mod phone;
pub mod platform;
pub mod report;
pub mod template;

use crate::cli::Cli;
use crate::config::{Config, PHONE_COLUMN};
use crate::contacts::ContactSheet;
use crate::error::AppError;
use crate::orchestrator::{Orchestrator, Summary};
use crate::platform::SystemPlatform;

/// The main entry point for the application logic.
///
/// This function orchestrates the entire process:
/// 1.  It validates the inputs and loads the contact sheet.
/// 2.  With `--show-placeholders` it lists the columns and returns.
/// 3.  Otherwise it runs the interactive send loop on stdin/stdout and prints
///     a summary.
///
/// # Errors
///
/// Returns an error for setup problems only: unreadable or unsupported input,
/// missing required columns, or a missing shared attachment. Per-contact
/// problems end up in the summary instead.
pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_cli(cli);

    println!("Loading data from: {}", cli.data_file.display());
    let sheet = load_sheet(&cli.data_file, &config)?;

    if cli.show_placeholders {
        report::write_placeholders(&mut io::stdout().lock(), &sheet.samples())?;
        return Ok(());
    }

    if let Some(path) = &config.attachment {
        if !path.is_file() {
            return Err(AppError::AttachmentNotFound(path.clone()).into());
        }
    }

    for name in template::unknown_placeholders(&config.template, &sheet.columns) {
        warn!("placeholder '{{{name}}}' matches no column and will be sent as written");
        println!("Warning: '{{{name}}}' matches no column and will be left as is.");
    }

    let stdin = io::stdin();
    let summary = send_all(&config, &sheet, stdin.lock(), io::stdout().lock(), SystemPlatform)
        .context("Lost contact with the terminal")?;
    debug!(?summary, "session finished");
    Ok(())
}

/// Loads the contacts, checks the required columns and drops rows without a phone.
pub fn load_sheet(path: &std::path::Path, config: &Config) -> Result<ContactSheet> {
    let mut sheet = data_loader::load_contacts(path)
        .with_context(|| format!("Failed to load contacts from {}", path.display()))?;

    sheet.require_columns(&config.required_columns())?;

    let dropped = sheet.retain_non_empty(PHONE_COLUMN);
    if dropped > 0 {
        debug!(dropped, "rows without a phone number ignored");
    }
    Ok(sheet)
}

/// Runs the banner, the per-contact loop and the summary against the given
/// terminal handles and platform.
pub fn send_all<P, R, W>(
    config: &Config,
    sheet: &ContactSheet,
    input: R,
    output: W,
    platform: P,
) -> io::Result<Summary>
where
    P: platform::Platform,
    R: io::BufRead,
    W: io::Write,
{
    let mut orchestrator = Orchestrator::new(config, platform, input, output);
    if !orchestrator.introduce(sheet.len())? {
        let summary = Summary {
            total: sheet.len(),
            quit_early: true,
            ..Summary::default()
        };
        orchestrator.finish(&summary)?;
        return Ok(summary);
    }
    let summary = orchestrator.run(&sheet.records)?;
    orchestrator.finish(&summary)?;
    Ok(summary)
}
