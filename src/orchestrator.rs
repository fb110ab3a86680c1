//! The per-contact send loop.
//!
//! Contacts are handled strictly one after another:
//! resolve → open chat → stage file → wait for the operator.
//! Nothing that goes wrong for one contact stops the loop; it is printed,
//! logged and collected into the [`Summary`].

use crate::attachment;
use crate::config::{Config, CLUB_COLUMN, NAME_COLUMN, PHONE_COLUMN};
use crate::contacts::Record;
use crate::phone;
use crate::platform::Platform;
use crate::report;
use crate::template;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything resolved for one contact before any side effect happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub name: String,
    pub club: String,
    /// Normalized phone; `None` if the cell held no digits.
    pub phone: Option<String>,
    pub message: String,
    pub attachment: Option<PathBuf>,
}

impl Prepared {
    /// The Resolve step: renders the message and picks the attachment.
    pub fn resolve(config: &Config, record: &Record) -> Self {
        let raw_phone = record.get(PHONE_COLUMN).unwrap_or_default();
        Self {
            name: record.non_empty(NAME_COLUMN).unwrap_or("N/A").to_string(),
            club: record.non_empty(CLUB_COLUMN).unwrap_or("N/A").to_string(),
            phone: phone::normalize(raw_phone, &config.country_code),
            message: template::render(&config.template, record),
            attachment: attachment::resolve(
                config.attachment.as_deref(),
                &config.files_dir,
                record,
            ),
        }
    }
}

/// What the operator answered after a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Done,
    Skip,
    Quit,
}

impl Reply {
    /// `s` skips, `q` quits, anything else (including a bare Enter) means done.
    /// End of input quits.
    pub fn parse(line: Option<&str>) -> Self {
        match line.map(|l| l.trim().to_lowercase()) {
            None => Reply::Quit,
            Some(answer) if answer == "q" => Reply::Quit,
            Some(answer) if answer == "s" => Reply::Skip,
            Some(_) => Reply::Done,
        }
    }
}

/// A per-contact problem that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub name: String,
    pub phone: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub sent: usize,
    pub skipped: usize,
    pub quit_early: bool,
    pub issues: Vec<Issue>,
}

/// Drives a [`Platform`] through the contact list, gated by operator input.
pub struct Orchestrator<'a, P, R, W> {
    config: &'a Config,
    platform: P,
    input: R,
    output: W,
    clear_screen: bool,
}

impl<'a, P, R, W> Orchestrator<'a, P, R, W>
where
    P: Platform,
    R: BufRead,
    W: Write,
{
    pub fn new(config: &'a Config, platform: P, input: R, output: W) -> Self {
        Self {
            config,
            platform,
            input,
            output,
            clear_screen: true,
        }
    }

    /// Disables clearing the terminal before each contact card.
    pub fn without_clearing(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn into_parts(self) -> (P, W) {
        (self.platform, self.output)
    }

    /// Shows the banner and waits for Enter. Returns `false` on end of input.
    pub fn introduce(&mut self, total: usize) -> io::Result<bool> {
        report::write_banner(&mut self.output, self.config, total)?;
        Ok(self.prompt("\nPress Enter to start...")?.is_some())
    }

    /// Runs every contact in order and returns the tally.
    ///
    /// Only failures to talk to the terminal are returned as errors.
    pub fn run(&mut self, records: &[Record]) -> io::Result<Summary> {
        let mut summary = Summary {
            total: records.len(),
            ..Summary::default()
        };

        for (index, record) in records.iter().enumerate() {
            match self.process(index + 1, records.len(), record, &mut summary)? {
                Reply::Done => summary.sent += 1,
                Reply::Skip => summary.skipped += 1,
                Reply::Quit => {
                    writeln!(self.output, "\nQuitting early...")?;
                    summary.quit_early = true;
                    break;
                }
            }
        }

        Ok(summary)
    }

    /// Writes the closing summary.
    pub fn finish(&mut self, summary: &Summary) -> io::Result<()> {
        self.clear()?;
        report::write_summary(&mut self.output, summary)
    }

    fn process(
        &mut self,
        position: usize,
        total: usize,
        record: &Record,
        summary: &mut Summary,
    ) -> io::Result<Reply> {
        // Resolve
        let contact = Prepared::resolve(self.config, record);

        self.clear()?;
        report::write_contact_card(&mut self.output, position, total, &contact)?;

        let Some(phone) = contact.phone.clone() else {
            let raw = record.get(PHONE_COLUMN).unwrap_or_default();
            self.report_issue(summary, &contact, format!("Invalid phone number: '{raw}'"))?;
            return Ok(Reply::Skip);
        };

        // Open
        match self.platform.open_chat(&phone, &contact.message) {
            Ok(()) => {
                info!(%phone, "opened chat");
                writeln!(self.output, "\n[OK] Opened WhatsApp chat with message")?;
                if !self.config.open_delay.is_zero() {
                    std::thread::sleep(self.config.open_delay);
                }
            }
            Err(e) => self.report_issue(summary, &contact, e.to_string())?,
        }

        // Stage
        let mut staged = false;
        if let Some(path) = &contact.attachment {
            if !path.is_file() {
                let description = format!("File not found: {}", path.display());
                self.report_issue(summary, &contact, description)?;
            } else {
                match self.platform.copy_file_to_clipboard(path) {
                    Ok(()) => {
                        info!(%phone, file = %path.display(), "file staged on clipboard");
                        writeln!(self.output, "[OK] File copied to clipboard!")?;
                        staged = true;
                    }
                    Err(e) => self.report_issue(summary, &contact, e.to_string())?,
                }
            }
        }

        // WaitForOperator
        report::write_operator_steps(&mut self.output, staged)?;
        let line = self.prompt("\nPress Enter when done (or 's' to skip, 'q' to quit): ")?;
        let reply = Reply::parse(line.as_deref());
        if reply == Reply::Skip {
            writeln!(self.output, "Skipped.")?;
        }
        Ok(reply)
    }

    fn report_issue(
        &mut self,
        summary: &mut Summary,
        contact: &Prepared,
        description: String,
    ) -> io::Result<()> {
        let phone = contact.phone.clone().unwrap_or_default();
        warn!(%phone, "{description}");
        writeln!(self.output, "\n[ERROR] {description}")?;
        summary.issues.push(Issue {
            name: contact.name.clone(),
            phone,
            description,
        });
        Ok(())
    }

    /// Prints `message` and blocks for one line of input; `None` at end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }
}
