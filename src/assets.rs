//! Identity icon and logo, stored as plain-text art files.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::log_debug;
use crate::text_layout::display_width;

/// Multi-line text picture drawn centred on the idle screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArt {
    lines: Vec<String>,
    width: usize,
}

impl TextArt {
    /// Parse art text. Trailing whitespace and blank edge rows are dropped.
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines: Vec<String> = text
            .lines()
            .map(|line| line.trim_end().replace('\t', "    "))
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        let leading = lines.iter().take_while(|line| line.is_empty()).count();
        lines.drain(..leading);
        if lines.is_empty() {
            return None;
        }
        let width = lines.iter().map(|line| display_width(line)).max().unwrap_or(0);
        Some(Self { lines, width })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match Self::parse(&text) {
            Some(art) => Ok(art),
            None => bail!("{} is empty", path.display()),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

/// Load optional art; failures are logged and leave that layer blank.
pub fn load_optional_art(path: Option<&Path>, label: &str) -> Option<TextArt> {
    let path = path?;
    match TextArt::load(path) {
        Ok(art) => Some(art),
        Err(err) => {
            log_debug(&format!("{label} unavailable: {err:#}"));
            tracing::warn!(asset = label, error = %format!("{err:#}"), "asset unavailable");
            None
        }
    }
}

/// Identity icon and logo for the idle screen.
#[derive(Debug, Clone, Default)]
pub struct ShowAssets {
    pub icon: Option<TextArt>,
    pub logo: Option<TextArt>,
}

impl ShowAssets {
    pub fn load(icon: Option<&Path>, logo: Option<&Path>) -> Self {
        Self {
            icon: load_optional_art(icon, "icon"),
            logo: load_optional_art(logo, "logo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn parse_trims_blank_edges() {
        let art = TextArt::parse("\n\n  /\\  \n /  \\\n\n").unwrap();
        assert_eq!(art.lines(), &["  /\\".to_string(), " /  \\".to_string()]);
        assert_eq!(art.width(), 5);
        assert_eq!(art.height(), 2);
    }

    #[test]
    fn blank_art_is_none() {
        assert!(TextArt::parse("  \n\n").is_none());
    }

    #[test]
    fn missing_file_degrades_to_none() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = env::temp_dir().join(format!("magic7ball_missing_art_{unique}.txt"));
        assert!(load_optional_art(Some(&path), "logo").is_none());
        assert!(load_optional_art(None, "logo").is_none());
    }

    #[test]
    fn load_reads_art_from_disk() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = env::temp_dir().join(format!("magic7ball_art_{unique}.txt"));
        fs::write(&path, "[7]\n").unwrap();
        let assets = ShowAssets::load(Some(&path), None);
        assert_eq!(assets.icon.map(|art| art.width()), Some(3));
        assert!(assets.logo.is_none());
        let _ = fs::remove_file(&path);
    }
}
