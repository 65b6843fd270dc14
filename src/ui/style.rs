//! Theming and color definitions.
//!
//! Each [`Theme`] maps to a [`Palette`]. The dark palette leans on the
//! terminal's own ANSI colors; the light palette uses darker indexed colors
//! that stay readable on a white background.

use ratatui::style::{Color, Modifier, Style};

use crate::view::Theme;

/// Styles for every element the UI draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Pane background and body text
    pub text: Style,
    pub border: Style,
    pub border_focused: Style,
    pub gutter: Style,
    pub headings: [Color; 6],
    /// Fenced code blocks
    pub code_block: Style,
    /// Inline `code`
    pub code_inline: Style,
    pub quote: Style,
    pub link: Style,
    pub rule: Style,
    pub muted: Style,
    /// Raw HTML source view
    pub markup: Style,
    pub error: Style,
    pub status: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
}

pub const fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Style::new().fg(Color::White).bg(Color::Reset),
            border: Style::new().fg(Color::DarkGray),
            border_focused: Style::new().fg(Color::Yellow),
            gutter: Style::new().fg(Color::DarkGray),
            headings: [
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Blue,
                Color::Magenta,
                Color::Cyan,
            ],
            code_block: Style::new().fg(Color::Indexed(250)).bg(Color::Indexed(236)),
            code_inline: Style::new().fg(Color::Indexed(215)).bg(Color::Indexed(236)),
            quote: Style::new().fg(Color::Blue).add_modifier(Modifier::ITALIC),
            link: Style::new()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            rule: Style::new().fg(Color::DarkGray),
            muted: Style::new().fg(Color::Indexed(245)),
            markup: Style::new().fg(Color::Indexed(180)),
            error: Style::new().fg(Color::White).bg(Color::Red),
            status: Style::new().fg(Color::White).bg(Color::DarkGray),
            tab_active: Style::new()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::new().fg(Color::Indexed(245)),
        },
        Theme::Light => Palette {
            text: Style::new().fg(Color::Black).bg(Color::White),
            border: Style::new().fg(Color::Indexed(250)).bg(Color::White),
            border_focused: Style::new().fg(Color::Indexed(24)).bg(Color::White),
            gutter: Style::new().fg(Color::Indexed(246)),
            headings: [
                Color::Indexed(24),
                Color::Indexed(22),
                Color::Indexed(58),
                Color::Indexed(24),
                Color::Indexed(54),
                Color::Indexed(24),
            ],
            code_block: Style::new().fg(Color::Indexed(238)).bg(Color::Indexed(254)),
            code_inline: Style::new().fg(Color::Indexed(124)).bg(Color::Indexed(254)),
            quote: Style::new()
                .fg(Color::Indexed(24))
                .add_modifier(Modifier::ITALIC),
            link: Style::new()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::UNDERLINED),
            rule: Style::new().fg(Color::Indexed(250)),
            muted: Style::new().fg(Color::Indexed(244)),
            markup: Style::new().fg(Color::Indexed(94)),
            error: Style::new().fg(Color::White).bg(Color::Indexed(160)),
            status: Style::new().fg(Color::Black).bg(Color::Indexed(252)),
            tab_active: Style::new()
                .fg(Color::White)
                .bg(Color::Indexed(24))
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::new().fg(Color::Indexed(244)),
        },
    }
}

impl Palette {
    /// Heading style for levels 1-6. Level 1 is also underlined.
    pub fn heading(&self, level: u8) -> Style {
        let idx = usize::from(level.clamp(1, 6) - 1);
        let style = Style::new()
            .fg(self.headings[idx])
            .add_modifier(Modifier::BOLD);
        if level == 1 {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        }
    }

    /// Style for a line of markdown source in the editor.
    ///
    /// `in_fence` is true for lines inside a fenced code block.
    pub fn source_line(&self, line: &str, in_fence: bool) -> Style {
        let trimmed = line.trim_start();
        if in_fence || is_fence(trimmed) {
            return self.code_block.bg(Color::Reset);
        }
        let hashes = trimmed.chars().take_while(|&c| c == '#').count();
        if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
            #[allow(clippy::cast_possible_truncation)]
            return self.heading(hashes as u8);
        }
        if trimmed.starts_with('>') {
            return self.quote;
        }
        if trimmed.starts_with('|') {
            return self.muted;
        }
        self.text
    }
}

/// Whether `line` (already left-trimmed) opens or closes a code fence.
pub fn is_fence(line: &str) -> bool {
    line.starts_with("```") || line.starts_with("~~~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels_are_bold_and_h1_underlined() {
        let p = palette(Theme::Dark);
        assert!(p.heading(1).add_modifier.contains(Modifier::UNDERLINED));
        assert!(p.heading(2).add_modifier.contains(Modifier::BOLD));
        assert!(!p.heading(2).add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(p.heading(9), p.heading(6));
    }

    #[test]
    fn test_source_line_classification() {
        let p = palette(Theme::Light);
        assert_eq!(p.source_line("## Title", false), p.heading(2));
        assert_eq!(p.source_line("#hashtag", false), p.text);
        assert_eq!(p.source_line("> quoted", false), p.quote);
        assert_eq!(p.source_line("let x = 1;", true), p.code_block.bg(Color::Reset));
        assert_eq!(p.source_line("plain", false), p.text);
    }

    #[test]
    fn test_themes_differ() {
        assert_ne!(palette(Theme::Light), palette(Theme::Dark));
    }
}
