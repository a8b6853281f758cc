//! Ticker configuration, persisted as JSON.
//!
//! The file lives at `$XDG_CONFIG_HOME/tickertape/ticker_config.json`
//! (or `$HOME/.config/...`). A missing file is created with defaults on
//! first load. Numeric values are clamped into range on every load, so a
//! hand-edited file can never push the ticker outside its operating limits.

use crate::buffer::{Modifiers, Rgb};
use crate::compositor::RenderStyle;
use crate::error::{Result, TickerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Directory name under the user's config directory.
const APP_DIR: &str = "tickertape";
/// Config file name.
const FILE_NAME: &str = "ticker_config.json";

/// Refresh interval bounds, in seconds.
pub const REFRESH_INTERVAL_RANGE: (u64, u64) = (10, 3600);
/// Scroll speed bounds, in pixels per tick.
pub const SCROLL_SPEED_RANGE: (f64, f64) = (1.0, 20.0);
/// Strip height bounds, in surface rows.
pub const STRIP_HEIGHT_RANGE: (u16, u16) = (1, 200);
/// Font size bounds, in points.
pub const FONT_SIZE_RANGE: (u16, u16) = (8, 72);

/// Named color presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Green on black.
    #[default]
    Green,
    /// Amber on black.
    Amber,
    /// White on black.
    White,
    /// Light blue on dark navy.
    Blue,
    /// Use `text_color` and `background_color` as given.
    Custom,
}

impl ColorScheme {
    /// `(text, background)` for a preset, `None` for [`ColorScheme::Custom`].
    pub const fn colors(self) -> Option<(Rgb, Rgb)> {
        match self {
            Self::Green => Some((Rgb::from_u32(0x00FF00), Rgb::BLACK)),
            Self::Amber => Some((Rgb::from_u32(0xFFB000), Rgb::BLACK)),
            Self::White => Some((Rgb::WHITE, Rgb::BLACK)),
            Self::Blue => Some((Rgb::from_u32(0x00BFFF), Rgb::from_u32(0x000020))),
            Self::Custom => None,
        }
    }
}

/// User-facing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Symbols in display order.
    pub symbols: Vec<String>,
    /// Seconds between refresh cycles.
    pub refresh_interval_secs: u64,
    /// Pixels the text moves per animation tick.
    pub scroll_speed: f64,
    /// Strip height in surface rows.
    pub strip_height: u16,
    /// Font family for hosts that have fonts.
    pub font_name: String,
    /// Font size in points.
    pub font_size: u16,
    /// Color preset.
    pub color_scheme: ColorScheme,
    /// Text color for [`ColorScheme::Custom`].
    pub text_color: Rgb,
    /// Background color for [`ColorScheme::Custom`].
    pub background_color: Rgb,
    /// Draw the text bold.
    pub bold: bool,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".into(), "MSFT".into(), "BTC-USD".into()],
            refresh_interval_secs: 60,
            scroll_speed: 5.0,
            strip_height: 1,
            font_name: "Consolas".into(),
            font_size: 16,
            color_scheme: ColorScheme::Green,
            text_color: Rgb::from_u32(0x00FF00),
            background_color: Rgb::BLACK,
            bold: false,
        }
    }
}

impl TickerConfig {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|v| !v.is_empty())
                    .map(|home| PathBuf::from(home).join(".config"))
            });
        Self::path_under(base)
    }

    fn path_under(base: Option<PathBuf>) -> PathBuf {
        match base {
            Some(dir) => dir.join(APP_DIR).join(FILE_NAME),
            None => PathBuf::from(FILE_NAME),
        }
    }

    /// Load from `path`, creating it with defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written, is not
    /// valid JSON, or lists no usable symbols.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!(path = %path.display(), "created default config");
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), symbols = config.symbols.len(), "config loaded");
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Normalise symbols and clamp numeric values into range.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Config`] if no symbol remains.
    pub fn validate(&mut self) -> Result<()> {
        self.symbols = self.symbols.iter().flat_map(|s| parse_symbols(s)).collect();
        if self.symbols.is_empty() {
            return Err(TickerError::Config("no symbols configured".into()));
        }

        let (lo, hi) = REFRESH_INTERVAL_RANGE;
        self.refresh_interval_secs = self.refresh_interval_secs.clamp(lo, hi);

        let (lo, hi) = SCROLL_SPEED_RANGE;
        self.scroll_speed = if self.scroll_speed.is_finite() {
            self.scroll_speed.clamp(lo, hi)
        } else {
            Self::default().scroll_speed
        };

        let (lo, hi) = STRIP_HEIGHT_RANGE;
        self.strip_height = self.strip_height.clamp(lo, hi);

        let (lo, hi) = FONT_SIZE_RANGE;
        self.font_size = self.font_size.clamp(lo, hi);

        Ok(())
    }

    /// Refresh interval as a [`Duration`].
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Effective `(text, background)` colors.
    pub fn colors(&self) -> (Rgb, Rgb) {
        self.color_scheme
            .colors()
            .unwrap_or((self.text_color, self.background_color))
    }

    /// Style consumed by the compositor.
    pub fn render_style(&self) -> RenderStyle {
        let (text_color, background) = self.colors();
        RenderStyle {
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            text_color,
            background,
            modifiers: if self.bold {
                Modifiers::BOLD
            } else {
                Modifiers::empty()
            },
        }
    }
}

/// Split a comma-separated symbol list, trimming and dropping empty entries.
pub fn parse_symbols(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols_trims_and_drops_empty() {
        assert_eq!(parse_symbols(" AAPL, ,MSFT ,,BTC-USD "), vec!["AAPL", "MSFT", "BTC-USD"]);
        assert!(parse_symbols(" , ").is_empty());
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILE_NAME);

        let config = TickerConfig::load(&path).unwrap();
        assert_eq!(config, TickerConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        let config = TickerConfig {
            symbols: vec!["ETH-USD".into()],
            refresh_interval_secs: 120,
            color_scheme: ColorScheme::Custom,
            text_color: Rgb::new(1, 2, 3),
            bold: true,
            ..TickerConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(TickerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_clamps_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(
            &path,
            r#"{"symbols":["AAPL"],"refresh_interval_secs":1,"scroll_speed":99.0,"strip_height":0,"font_size":500}"#,
        )
        .unwrap();

        let config = TickerConfig::load(&path).unwrap();
        assert_eq!(config.refresh_interval_secs, 10);
        assert_eq!(config.scroll_speed, 20.0);
        assert_eq!(config.strip_height, 1);
        assert_eq!(config.font_size, 72);
        // Fields not in the file fall back to defaults.
        assert_eq!(config.font_name, "Consolas");
    }

    #[test]
    fn test_load_rejects_empty_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, r#"{"symbols":[" ", ""]}"#).unwrap();

        assert!(matches!(TickerConfig::load(&path), Err(TickerError::Config(_))));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(TickerConfig::load(&path), Err(TickerError::Json(_))));
    }

    #[test]
    fn test_comma_lists_inside_symbols_are_split() {
        let mut config = TickerConfig {
            symbols: vec!["AAPL, MSFT".into(), " TSLA ".into()],
            ..TickerConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(config.symbols, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn test_color_scheme_and_render_style() {
        let config = TickerConfig {
            color_scheme: ColorScheme::Blue,
            bold: true,
            ..TickerConfig::default()
        };
        let style = config.render_style();
        assert_eq!(style.text_color, Rgb::from_u32(0x00BFFF));
        assert_eq!(style.background, Rgb::from_u32(0x000020));
        assert!(style.modifiers.contains(Modifiers::BOLD));

        let custom = TickerConfig {
            color_scheme: ColorScheme::Custom,
            text_color: Rgb::new(9, 9, 9),
            background_color: Rgb::new(1, 1, 1),
            ..TickerConfig::default()
        };
        assert_eq!(custom.colors(), (Rgb::new(9, 9, 9), Rgb::new(1, 1, 1)));
    }

    #[test]
    fn test_path_under_base_dir() {
        let path = TickerConfig::path_under(Some(PathBuf::from("/tmp/cfg")));
        assert_eq!(path, PathBuf::from("/tmp/cfg/tickertape/ticker_config.json"));
        assert_eq!(TickerConfig::path_under(None), PathBuf::from(FILE_NAME));
    }
}
