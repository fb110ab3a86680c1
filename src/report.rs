//! Operator-facing console output: session banner, contact cards, and the
//! closing summary.

use crate::config::Config;
use crate::orchestrator::{Prepared, Summary};
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 60;

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Prints the instructions shown once before the first contact.
pub fn write_banner<W: Write>(out: &mut W, config: &Config, total: usize) -> io::Result<()> {
    writeln!(out, "Found {total} contacts to process.")?;
    writeln!(out)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "INSTRUCTIONS:")?;
    writeln!(out, "1. Make sure WhatsApp Desktop is open and logged in")?;
    writeln!(out, "2. For each contact, this tool will:")?;
    writeln!(out, "   - Open the chat with a pre-filled message")?;
    match &config.attachment {
        Some(path) => writeln!(
            out,
            "   - Copy the attachment to your clipboard: {}",
            path.display()
        )?,
        None => writeln!(out, "   - Copy the contact's file to your clipboard")?,
    }
    writeln!(out, "3. You need to:")?;
    writeln!(out, "   - Press Enter or Send (to send the message)")?;
    writeln!(out, "   - Paste the file and press Send again")?;
    writeln!(out, "   - Come back here and press Enter for the next contact")?;
    writeln!(out, "{}", rule('='))?;

    writeln!(out)?;
    writeln!(out, "Message template:")?;
    writeln!(out, "  \"{}\"", config.template)?;

    if let Some(path) = &config.attachment {
        writeln!(out)?;
        writeln!(out, "Attachment (same for all contacts):")?;
        writeln!(out, "  \"{}\"", display_absolute(path))?;
    }
    writeln!(out, "{}", rule('='))?;
    Ok(())
}

/// Prints one contact's details before its chat is opened.
pub fn write_contact_card<W: Write>(
    out: &mut W,
    position: usize,
    total: usize,
    contact: &Prepared,
) -> io::Result<()> {
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "CONTACT {position} of {total}")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Name:  {}", contact.name)?;
    writeln!(out, "Club:  {}", contact.club)?;
    writeln!(out, "Phone: {}", contact.phone.as_deref().unwrap_or("(invalid)"))?;
    if let Some(path) = &contact.attachment {
        writeln!(out, "File:  {}", path.display())?;
    }
    writeln!(out)?;
    writeln!(out, "Message: {}", contact.message)?;
    writeln!(out, "{}", rule('='))?;
    Ok(())
}

/// Prints what the operator has to do in WhatsApp for the current contact.
pub fn write_operator_steps<W: Write>(out: &mut W, has_file: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule('-'))?;
    writeln!(out, "NOW DO THIS:")?;
    writeln!(out, "  1. Click on the WhatsApp window")?;
    writeln!(out, "  2. Press Enter or click Send (message is pre-filled)")?;
    if has_file {
        writeln!(out, "  3. Paste the file (Cmd+V / Ctrl+V)")?;
        writeln!(out, "  4. Press Enter or click Send again")?;
    }
    writeln!(out, "{}", rule('-'))?;
    Ok(())
}

/// Prints the totals and every per-contact issue of the run.
pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Total contacts: {}", summary.total)?;
    writeln!(out, "Sent:           {}", summary.sent)?;
    writeln!(out, "Skipped:        {}", summary.skipped)?;
    writeln!(out, "Issues:         {}", summary.issues.len())?;
    if summary.quit_early {
        writeln!(out, "(stopped early by operator)")?;
    }

    if !summary.issues.is_empty() {
        writeln!(out)?;
        writeln!(out, "Issues encountered:")?;
        for issue in &summary.issues {
            writeln!(out, "  - {} ({}): {}", issue.name, issue.phone, issue.description)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Done!")?;
    Ok(())
}

/// Prints every column as a `{placeholder}` with the first contact's value.
pub fn write_placeholders<W: Write>(out: &mut W, samples: &[(&str, &str)]) -> io::Result<()> {
    writeln!(out, "Available placeholders (sample from the first contact):")?;
    let width = samples
        .iter()
        .map(|(name, _)| name.chars().count() + 2)
        .max()
        .unwrap_or(0);
    for (name, sample) in samples {
        let token = format!("{{{name}}}");
        writeln!(out, "  {token:<width$}  {sample}")?;
    }
    Ok(())
}

fn display_absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
