use std::io::{Write, stdout};

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::convert::LivePreview;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

impl App {
    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        live: &mut LivePreview,
        msg: &Message,
    ) {
        match msg {
            Message::ConvertNow => {
                let conversion = live.flush(model.buffer.revision(), &model.buffer.text());
                let failed = conversion.is_fallback();
                *model = update(std::mem::take(model), Message::Rendered(conversion));
                if failed {
                    model.show_toast(ToastLevel::Error, "Conversion failed");
                }
            }
            Message::CopyHtml => {
                let html = model.rendered.html.clone();
                copy_with_toast(model, &html, "HTML");
            }
            Message::CopyMarkdown => {
                let text = model.buffer.text();
                copy_with_toast(model, &text, "Markdown");
            }
            _ => {}
        }
    }
}

/// How a copy request ended.
#[derive(Debug)]
enum CopyOutcome {
    Empty,
    Copied(ClipboardRoute),
    Failed(std::io::Error),
}

/// Which mechanism delivered the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipboardRoute {
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    Pbcopy,
    Osc52,
}

impl ClipboardRoute {
    const fn label(self) -> &'static str {
        match self {
            Self::Pbcopy => "pbcopy",
            Self::Osc52 => "terminal",
        }
    }
}

fn copy_with_toast(model: &mut Model, text: &str, what: &str) {
    match copy_text(text, &mut stdout()) {
        CopyOutcome::Empty => model.show_toast(ToastLevel::Warning, "Nothing to copy"),
        CopyOutcome::Copied(route) => {
            tracing::debug!(
                what,
                bytes = text.len(),
                route = route.label(),
                "copied to clipboard"
            );
            model.show_toast(ToastLevel::Info, format!("Copied {what} to clipboard"));
        }
        CopyOutcome::Failed(err) => {
            tracing::warn!(what, error = %err, "clipboard copy failed");
            model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
        }
    }
}

/// Copy `text`, preferring pbcopy on macOS and falling back to an OSC 52
/// sequence written to `terminal`.
fn copy_text(text: &str, terminal: &mut impl Write) -> CopyOutcome {
    if text.trim().is_empty() {
        return CopyOutcome::Empty;
    }
    #[cfg(target_os = "macos")]
    if pbcopy(text).is_ok() {
        return CopyOutcome::Copied(ClipboardRoute::Pbcopy);
    }
    match write_osc52(terminal, text) {
        Ok(()) => CopyOutcome::Copied(ClipboardRoute::Osc52),
        Err(err) => CopyOutcome::Failed(err),
    }
}

#[cfg(target_os = "macos")]
fn pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut pipe) = child.stdin.take() {
        pipe.write_all(text.as_bytes())?;
    }
    if child.wait()?.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy exited with an error"))
    }
}

/// Set-clipboard escape: `ESC ] 52 ; c ; <base64> BEL`.
fn write_osc52(terminal: &mut impl Write, text: &str) -> std::io::Result<()> {
    let payload = STANDARD.encode(text.as_bytes());
    write!(terminal, "\x1b]52;c;{payload}\x07")?;
    terminal.flush()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{ClipboardRoute, CopyOutcome, copy_text, write_osc52};

    fn osc52(text: &str) -> String {
        let mut out = Vec::new();
        write_osc52(&mut out, text).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[cfg(not(target_os = "macos"))]
    struct BrokenTerminal;

    #[cfg(not(target_os = "macos"))]
    impl Write for BrokenTerminal {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("terminal closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_osc52_encodes_text() {
        assert_eq!(osc52("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_osc52_encodes_markup() {
        assert_eq!(osc52("<h1>A</h1>"), "\x1b]52;c;PGgxPkE8L2gxPg==\x07");
    }

    #[test]
    fn test_blank_text_is_not_copied() {
        let mut out = Vec::new();
        assert!(matches!(copy_text(" \n\t", &mut out), CopyOutcome::Empty));
        assert!(out.is_empty());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_copy_goes_through_osc52() {
        let mut out = Vec::new();
        let outcome = copy_text("hi", &mut out);
        assert!(matches!(outcome, CopyOutcome::Copied(ClipboardRoute::Osc52)));
        assert_eq!(out, b"\x1b]52;c;aGk=\x07");
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_write_error_is_reported() {
        let outcome = copy_text("hi", &mut BrokenTerminal);
        assert!(matches!(outcome, CopyOutcome::Failed(_)));
    }
}
