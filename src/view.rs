//! Presentation state: which panes are shown and how.

/// Which panes are visible.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Editor only
    Edit,
    /// Editor and preview side by side
    #[default]
    Split,
    /// Preview only
    Preview,
}

impl ViewMode {
    pub const fn next(self) -> Self {
        match self {
            Self::Edit => Self::Split,
            Self::Split => Self::Preview,
            Self::Preview => Self::Edit,
        }
    }

    pub const fn shows_editor(self) -> bool {
        matches!(self, Self::Edit | Self::Split)
    }

    pub const fn shows_preview(self) -> bool {
        matches!(self, Self::Split | Self::Preview)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Split => "split",
            Self::Preview => "preview",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "edit" => Some(Self::Edit),
            "split" => Some(Self::Split),
            "preview" => Some(Self::Preview),
            _ => None,
        }
    }
}

/// Color theme.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Everything about how the session is displayed. Independent of the
/// document and its rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub theme: Theme,
    /// Hide the tab bar, status bar and pane borders.
    pub fullscreen: bool,
    /// Show the raw HTML string instead of the rendered preview.
    pub html_source: bool,
}
