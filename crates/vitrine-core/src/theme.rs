//! # Theme Palette
//!
//! Maps a [`ThemeMode`] to the brand colour the presentation layer exports
//! as its `--brand-rgb` variable.

use crate::types::ThemeMode;
use serde::{Deserialize, Serialize};

/// Colours derived from the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePalette {
    pub mode: ThemeMode,
    pub brand_rgb: [u8; 3],
}

impl ThemePalette {
    #[must_use]
    pub const fn for_mode(mode: ThemeMode) -> Self {
        let brand_rgb = match mode {
            ThemeMode::Gold => [234, 179, 8],
            ThemeMode::Cyber => [14, 165, 233],
            ThemeMode::Matrix => [34, 197, 94],
        };
        Self { mode, brand_rgb }
    }

    /// `"r, g, b"` form used in CSS custom properties.
    #[must_use]
    pub fn css_rgb(&self) -> String {
        let [r, g, b] = self.brand_rgb;
        format!("{r}, {g}, {b}")
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self::for_mode(ThemeMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gold_is_default() {
        assert_eq!(ThemePalette::default().css_rgb(), "234, 179, 8");
    }

    #[test]
    fn every_mode_has_a_distinct_colour() {
        let cyber = ThemePalette::for_mode(ThemeMode::Cyber);
        let matrix = ThemePalette::for_mode(ThemeMode::Matrix);
        assert_eq!(cyber.brand_rgb, [14, 165, 233]);
        assert_ne!(cyber.brand_rgb, matrix.brand_rgb);
    }
}
