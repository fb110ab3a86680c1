//! OS-level actions: opening a WhatsApp chat and putting a file on the clipboard.
//!
//! Neither action gets feedback from WhatsApp itself. Success only means the
//! OS accepted the request.

use crate::error::AppError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// The external side effects of a send run.
pub trait Platform {
    /// Opens the chat for `phone` (international digits) with `message` in the
    /// input box, not sent.
    fn open_chat(&mut self, phone: &str, message: &str) -> Result<(), AppError>;

    /// Places the file at `path` on the clipboard so it can be pasted into the chat.
    fn copy_file_to_clipboard(&mut self, path: &Path) -> Result<(), AppError>;
}

impl<P: Platform + ?Sized> Platform for &mut P {
    fn open_chat(&mut self, phone: &str, message: &str) -> Result<(), AppError> {
        (**self).open_chat(phone, message)
    }

    fn copy_file_to_clipboard(&mut self, path: &Path) -> Result<(), AppError> {
        (**self).copy_file_to_clipboard(path)
    }
}

/// Builds the `whatsapp://send` URL for a chat, percent-encoding the text.
pub fn whatsapp_url(phone: &str, message: &str) -> String {
    if message.is_empty() {
        format!("whatsapp://send?phone={phone}")
    } else {
        format!(
            "whatsapp://send?phone={phone}&text={}",
            urlencoding::encode(message)
        )
    }
}

/// [`Platform`] backed by the desktop this process runs on.
#[derive(Debug, Default)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn open_chat(&mut self, phone: &str, message: &str) -> Result<(), AppError> {
        let url = whatsapp_url(phone, message);
        debug!(%url, "opening chat");
        open::that(&url).map_err(|e| AppError::OpenChat(e.to_string()))
    }

    fn copy_file_to_clipboard(&mut self, path: &Path) -> Result<(), AppError> {
        let abs_path = std::path::absolute(path)?;
        if !abs_path.is_file() {
            return Err(AppError::AttachmentNotFound(abs_path));
        }
        debug!(path = %abs_path.display(), "copying file to clipboard");
        copy_file(&abs_path)
    }
}

/// Escape a string for inclusion in an AppleScript string literal.
///
/// Backslashes must be escaped before quotes.
#[cfg_attr(not(any(target_os = "macos", test)), allow(dead_code))]
fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(target_os = "macos")]
fn copy_file(path: &Path) -> Result<(), AppError> {
    let script = format!(
        "set the clipboard to (POSIX file \"{}\")",
        escape_applescript_string(&path.to_string_lossy())
    );
    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    run_clipboard_command(cmd)
}

#[cfg(target_os = "linux")]
fn copy_file(path: &Path) -> Result<(), AppError> {
    let mut cmd = Command::new("xclip");
    cmd.args(["-selection", "clipboard", "-t", "text/uri-list"]);
    pipe_to_clipboard_command(cmd, &file_uri(path))
}

#[cfg(target_os = "windows")]
fn copy_file(path: &Path) -> Result<(), AppError> {
    let literal = path.to_string_lossy().replace('\'', "''");
    let mut cmd = Command::new("powershell");
    cmd.args(["-NoProfile", "-Command"])
        .arg(format!("Set-Clipboard -LiteralPath '{literal}'"));
    run_clipboard_command(cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn copy_file(_path: &Path) -> Result<(), AppError> {
    Err(AppError::Clipboard(
        "copying files is not supported on this platform".to_string(),
    ))
}

/// `file://` URI with each path segment percent-encoded.
#[cfg_attr(not(any(target_os = "linux", test)), allow(dead_code))]
fn file_uri(path: &Path) -> String {
    let encoded: Vec<String> = path
        .to_string_lossy()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("file://{}", encoded.join("/"))
}

/// Runs a clipboard tool that exits once the clipboard is set, keeping its
/// stderr for the error message.
#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
fn run_clipboard_command(mut cmd: Command) -> Result<(), AppError> {
    use std::process::Stdio;

    let program = cmd.get_program().to_string_lossy().to_string();
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| AppError::Clipboard(format!("could not run {program}: {e}")))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(AppError::Clipboard(format!(
            "{program} failed: {}",
            stderr.trim()
        )))
    }
}

/// Feeds `input` to a clipboard tool that forks a process to keep serving the
/// selection (xclip). None of its output streams are piped, since the forked
/// process holds them open until another application takes the clipboard.
/// Only the exit status of the tool itself is waited for.
#[cfg_attr(not(any(target_os = "linux", test)), allow(dead_code))]
fn pipe_to_clipboard_command(mut cmd: Command, input: &str) -> Result<(), AppError> {
    use std::io::Write;
    use std::process::Stdio;

    let program = cmd.get_program().to_string_lossy().to_string();
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| AppError::Clipboard(format!("could not run {program}: {e}")))?;

    // The pipe is dropped before waiting so the tool sees end of input.
    let written = match child.stdin.take() {
        Some(mut pipe) => pipe.write_all(input.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written.map_err(|e| AppError::Clipboard(format!("writing to {program} failed: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Clipboard(format!("{program} failed: {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_message_text() {
        assert_eq!(
            whatsapp_url("593991234567", "Hola Ana & co. ¡Saludos!"),
            "whatsapp://send?phone=593991234567&text=Hola%20Ana%20%26%20co.%20%C2%A1Saludos%21"
        );
    }

    #[test]
    fn url_omits_text_for_empty_message() {
        assert_eq!(
            whatsapp_url("593991234567", ""),
            "whatsapp://send?phone=593991234567"
        );
    }

    #[test]
    fn applescript_escapes_backslash_before_quote() {
        assert_eq!(escape_applescript_string(r#"a\"b"#), r#"a\\\"b"#);
    }

    #[test]
    fn file_uri_encodes_segments() {
        assert_eq!(
            file_uri(Path::new("/tmp/mis invitaciones/flyer #1.pdf")),
            "file:///tmp/mis%20invitaciones/flyer%20%231.pdf"
        );
    }

    #[cfg(unix)]
    fn forking_tool(dir: &tempfile::TempDir, exit_code: i32) -> Command {
        let script = dir.path().join("fake-xclip.sh");
        std::fs::write(
            &script,
            format!("cat >/dev/null\n( sleep 5 ) &\nexit {exit_code}\n"),
        )
        .expect("Failed to write fake clipboard tool");
        let mut cmd = Command::new("sh");
        cmd.arg(script);
        cmd
    }

    #[cfg(unix)]
    #[test]
    fn forked_clipboard_server_does_not_block() {
        let dir = tempfile::TempDir::new().unwrap();
        let started = std::time::Instant::now();

        let result = pipe_to_clipboard_command(forking_tool(&dir, 0), "file:///tmp/flyer.pdf\n");

        assert!(result.is_ok());
        assert!(
            started.elapsed() < std::time::Duration::from_secs(3),
            "waited {:?} for the forked child",
            started.elapsed()
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_clipboard_tool_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = pipe_to_clipboard_command(forking_tool(&dir, 3), "x").unwrap_err();
        assert!(matches!(err, AppError::Clipboard(_)));
    }

    #[cfg(unix)]
    #[test]
    fn tool_that_ignores_input_is_still_waited_on() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 0"]);
        let big = "x".repeat(1 << 20);
        // Either the write fails with a broken pipe or it fits; both must return.
        let _ = pipe_to_clipboard_command(cmd, &big);
    }

    #[test]
    fn missing_file_is_reported_before_any_command_runs() {
        let err = SystemPlatform
            .copy_file_to_clipboard(Path::new("definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, AppError::AttachmentNotFound(_)));
    }
}
