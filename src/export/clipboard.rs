//! Clipboard integration for copying the annotated image.

use super::types::ExportError;
use std::io::Write;
use std::process::{Command, Stdio};
use wl_clipboard_rs::copy::{MimeType, Options, Source};

const PNG_MIME: &str = "image/png";
const WL_COPY_ARGS: &[&str] = &["--type", PNG_MIME];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard", "-t", PNG_MIME];

/// Which clipboard helper handles the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    /// `wl-copy`, with the wl-clipboard-rs library as fallback
    Wayland,
    /// `xclip`
    X11,
}

impl ClipboardBackend {
    /// Picks the backend from the process environment.
    pub fn detect() -> Self {
        Self::detect_with(|name| std::env::var_os(name).is_some())
    }

    /// Picks Wayland when `WAYLAND_DISPLAY` is set, X11 otherwise.
    pub fn detect_with<F>(is_set: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        if is_set("WAYLAND_DISPLAY") {
            ClipboardBackend::Wayland
        } else {
            ClipboardBackend::X11
        }
    }

    /// Helper program and arguments receiving PNG bytes on stdin.
    pub fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            ClipboardBackend::Wayland => ("wl-copy", WL_COPY_ARGS),
            ClipboardBackend::X11 => ("xclip", XCLIP_ARGS),
        }
    }
}

/// Copy PNG bytes to the clipboard of the current session.
pub fn copy_to_clipboard(image_data: &[u8]) -> Result<(), ExportError> {
    copy_with_backend(ClipboardBackend::detect(), image_data)
}

/// Copy PNG bytes through `backend`.
///
/// On Wayland a failing `wl-copy` falls back to wl-clipboard-rs.
pub fn copy_with_backend(backend: ClipboardBackend, image_data: &[u8]) -> Result<(), ExportError> {
    log::debug!(
        "Attempting to copy image to clipboard via {:?} ({} bytes)",
        backend,
        image_data.len()
    );

    let (program, args) = backend.command();
    match copy_via_command(program, args, image_data) {
        Ok(()) => {
            log::info!("Copied annotated image to clipboard via {program}");
            Ok(())
        }
        Err(cmd_err) if backend == ClipboardBackend::Wayland => {
            log::warn!(
                "{} command path failed ({}). Falling back to wl-clipboard-rs",
                program,
                cmd_err
            );
            copy_via_library(image_data).map_err(|lib_err| {
                ExportError::Clipboard(format!(
                    "{program} failed: {cmd_err} ; wl-clipboard-rs failed: {lib_err}"
                ))
            })?;
            log::info!("Copied annotated image to clipboard via wl-clipboard-rs fallback");
            Ok(())
        }
        Err(cmd_err) => Err(cmd_err),
    }
}

/// Copy to clipboard using wl-clipboard-rs library.
fn copy_via_library(image_data: &[u8]) -> Result<(), ExportError> {
    use wl_clipboard_rs::copy::ServeRequests;

    let mut opts = Options::new();
    // Serve one paste then exit
    opts.serve_requests(ServeRequests::Only(1));

    opts.copy(
        Source::Bytes(image_data.into()),
        MimeType::Specific(PNG_MIME.to_string()),
    )
    .map_err(|e| ExportError::Clipboard(format!("wl-clipboard-rs error: {}", e)))?;

    Ok(())
}

/// Copy by piping the image into a clipboard helper and waiting for it.
pub fn copy_via_command(program: &str, args: &[&str], image_data: &[u8]) -> Result<(), ExportError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            ExportError::Clipboard(format!(
                "Failed to spawn {program} (is it installed?): {e}"
            ))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(image_data).map_err(|e| {
            ExportError::Clipboard(format!("Failed to write to {program} stdin: {e}"))
        })?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| ExportError::Clipboard(format!("Failed to wait for {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExportError::Clipboard(format!(
            "{program} failed: {}",
            stderr.trim()
        )));
    }

    log::debug!("{program} command completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_backend_from_wayland_display() {
        assert_eq!(
            ClipboardBackend::detect_with(|name| name == "WAYLAND_DISPLAY"),
            ClipboardBackend::Wayland
        );
        assert_eq!(
            ClipboardBackend::detect_with(|_| false),
            ClipboardBackend::X11
        );
    }

    #[test]
    fn commands_request_png() {
        let (program, args) = ClipboardBackend::Wayland.command();
        assert_eq!(program, "wl-copy");
        assert!(args.contains(&"image/png"));

        let (program, args) = ClipboardBackend::X11.command();
        assert_eq!(program, "xclip");
        assert_eq!(args, &["-selection", "clipboard", "-t", "image/png"]);
    }

    #[cfg(unix)]
    #[test]
    fn command_receives_bytes_on_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.bin");
        let script = format!("cat > '{}'", out.display());

        copy_via_command("sh", &["-c", &script], b"png-bytes").unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"png-bytes");
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_stderr() {
        let err = copy_via_command("sh", &["-c", "cat >/dev/null; echo nope >&2; exit 3"], b"x")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sh failed: nope"), "{message}");
    }

    #[test]
    fn missing_program_is_a_clipboard_error() {
        let err = copy_via_command("imgmark-no-such-clipboard-helper", &[], b"x").unwrap_err();
        assert!(matches!(err, ExportError::Clipboard(_)));
    }
}
