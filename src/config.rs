//! Saved defaults.
//!
//! Config files hold command-line flag tokens, one or more per line, with
//! `#` comments. The global file is overridden by a local `.markpanerc`,
//! which is overridden by the actual command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::view::{Theme, ViewMode};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub view: Option<ViewMode>,
    pub theme: Option<Theme>,
    pub debounce_ms: Option<u64>,
    pub fullscreen: bool,
    pub unsafe_html: bool,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge with `other` taking precedence for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            view: other.view.or(self.view),
            theme: other.theme.or(self.theme),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            fullscreen: self.fullscreen || other.fullscreen,
            unsafe_html: self.unsafe_html || other.unsafe_html,
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpane").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpane")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpane").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpane")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpanerc")
}

/// Load flags from `path`; a missing file yields defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# markpane defaults (saved with --save)".to_string()];
    if let Some(view) = flags.view {
        lines.push(format!("--view {}", view.as_str()));
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(ms) = flags.debounce_ms {
        lines.push(format!("--debounce-ms {ms}"));
    }
    if flags.fullscreen {
        lines.push("--fullscreen".to_string());
    }
    if flags.unsafe_html {
        lines.push("--unsafe-html".to_string());
    }
    if let Some(log) = &flags.log_file {
        lines.push(format!("--log-file {}", log.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract the flags markpane saves from raw argument tokens.
///
/// Unknown tokens and invalid values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(name, "--view" | "--theme" | "--debounce-ms" | "--log-file");
        let value = if takes_value && inline_value.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline_value
        };

        match (name, value) {
            ("--fullscreen", None) => flags.fullscreen = true,
            ("--unsafe-html", None) => flags.unsafe_html = true,
            ("--view", Some(v)) => flags.view = ViewMode::parse(v),
            ("--theme", Some(v)) => flags.theme = Theme::parse(v),
            ("--debounce-ms", Some(v)) => flags.debounce_ms = v.parse().ok(),
            ("--log-file", Some(v)) => flags.log_file = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "markpane",
            "--view",
            "preview",
            "--theme=light",
            "--debounce-ms",
            "150",
            "--fullscreen",
            "--unsafe-html",
            "--log-file=markpane.log",
            "notes.md",
        ]));
        assert_eq!(flags.view, Some(ViewMode::Preview));
        assert_eq!(flags.theme, Some(Theme::Light));
        assert_eq!(flags.debounce_ms, Some(150));
        assert!(flags.fullscreen);
        assert!(flags.unsafe_html);
        assert_eq!(flags.log_file, Some(PathBuf::from("markpane.log")));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let flags = parse_flag_tokens(&args(&["--view", "sideways", "--debounce-ms", "soon"]));
        assert_eq!(flags.view, None);
        assert_eq!(flags.debounce_ms, None);
    }

    #[test]
    fn test_value_flag_at_end_without_value() {
        let flags = parse_flag_tokens(&args(&["--fullscreen", "--theme"]));
        assert!(flags.fullscreen);
        assert_eq!(flags.theme, None);
    }

    #[test]
    fn test_config_union_prefers_later_values() {
        let file = ConfigFlags {
            view: Some(ViewMode::Edit),
            theme: Some(Theme::Light),
            fullscreen: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            theme: Some(Theme::Dark),
            debounce_ms: Some(50),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.view, Some(ViewMode::Edit));
        assert_eq!(merged.theme, Some(Theme::Dark));
        assert_eq!(merged.debounce_ms, Some(50));
        assert!(merged.fullscreen);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            view: Some(ViewMode::Preview),
            theme: Some(Theme::Light),
            debounce_ms: Some(120),
            fullscreen: true,
            unsafe_html: true,
            log_file: Some(PathBuf::from("debug.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
