use std::fmt;

use serde::Deserialize;

use crate::catalog::{
    asset_by_src, ACCEPT_ASSET, DEFAULT_ACCEPT_LABEL, DEFAULT_CELEBRATION_PROMPT, DEFAULT_PROMPT,
    DEFAULT_REFUSE_LABEL, DEFAULT_WAITING_PROMPT, REFUSAL_ALT, REFUSAL_ASSETS, REFUSAL_TEXTS,
    SCALE_TABLE,
};
use crate::geometry::Size;

pub const DEBOUNCE_MS_DEFAULT: f64 = 300.0;
pub const SHAKE_MS_DEFAULT: u32 = 400;
pub const EDGE_PADDING_DEFAULT: f64 = 15.0;
pub const OVERLAP_BUFFER_DEFAULT: f64 = 5.0;
pub const MAX_ATTEMPTS_DEFAULT: u32 = 100;
pub const FALLBACK_WIDTH_DEFAULT: f64 = 120.0;
pub const FALLBACK_HEIGHT_DEFAULT: f64 = 50.0;
pub const VIEWPORT_PADDING_DEFAULT: f64 = 30.0;
pub const VIEWPORT_MARGIN_DEFAULT: f64 = 10.0;
pub const CELEBRATION_DURATION_MS_DEFAULT: f64 = 3000.0;
pub const CELEBRATION_INTERVAL_MS_DEFAULT: u32 = 250;
pub const CELEBRATION_PARTICLES_DEFAULT: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementPolicy {
    /// Uniform point anywhere in the padded viewport.
    Viewport,
    /// Safe zones around the content panel, then rejection sampling.
    #[default]
    Zones,
}

impl PlacementPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viewport" | "naive" => Some(Self::Viewport),
            "zones" | "zone" => Some(Self::Zones),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viewport => "viewport",
            Self::Zones => "zones",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub policy: PlacementPolicy,
    pub edge_padding: f64,
    pub overlap_buffer: f64,
    pub max_attempts: u32,
    pub fallback_width: f64,
    pub fallback_height: f64,
    pub viewport_padding: f64,
    pub viewport_margin: f64,
}

impl PlacementConfig {
    pub fn fallback_size(&self) -> Size {
        Size::new(self.fallback_width, self.fallback_height)
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            policy: PlacementPolicy::default(),
            edge_padding: EDGE_PADDING_DEFAULT,
            overlap_buffer: OVERLAP_BUFFER_DEFAULT,
            max_attempts: MAX_ATTEMPTS_DEFAULT,
            fallback_width: FALLBACK_WIDTH_DEFAULT,
            fallback_height: FALLBACK_HEIGHT_DEFAULT,
            viewport_padding: VIEWPORT_PADDING_DEFAULT,
            viewport_margin: VIEWPORT_MARGIN_DEFAULT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    pub duration_ms: f64,
    pub interval_ms: u32,
    pub initial_particles: f64,
    pub start_velocity: f64,
    pub spread: f64,
    pub ticks: u32,
    pub z_index: i32,
    /// Horizontal origin band of the left burst, as viewport fractions.
    pub left_band: [f64; 2],
    pub right_band: [f64; 2],
    pub origin_y_offset: f64,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            duration_ms: CELEBRATION_DURATION_MS_DEFAULT,
            interval_ms: CELEBRATION_INTERVAL_MS_DEFAULT,
            initial_particles: CELEBRATION_PARTICLES_DEFAULT,
            start_velocity: 30.0,
            spread: 360.0,
            ticks: 60,
            z_index: 999,
            left_band: [0.1, 0.3],
            right_band: [0.7, 0.9],
            origin_y_offset: 0.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub prompt: String,
    pub accept_label: String,
    pub refuse_label: String,
    pub waiting_prompt: String,
    pub celebration_prompt: String,
    pub refusal_texts: Vec<String>,
    pub refusal_images: Vec<String>,
    pub accept_image: String,
    pub scale_table: Vec<f64>,
    pub debounce_ms: f64,
    pub shake_ms: u32,
    pub placement: PlacementConfig,
    pub celebration: CelebrationConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            accept_label: DEFAULT_ACCEPT_LABEL.to_string(),
            refuse_label: DEFAULT_REFUSE_LABEL.to_string(),
            waiting_prompt: DEFAULT_WAITING_PROMPT.to_string(),
            celebration_prompt: DEFAULT_CELEBRATION_PROMPT.to_string(),
            refusal_texts: REFUSAL_TEXTS.iter().map(|text| text.to_string()).collect(),
            refusal_images: REFUSAL_ASSETS
                .iter()
                .map(|entry| entry.src.to_string())
                .collect(),
            accept_image: ACCEPT_ASSET.src.to_string(),
            scale_table: SCALE_TABLE.to_vec(),
            debounce_ms: DEBOUNCE_MS_DEFAULT,
            shake_ms: SHAKE_MS_DEFAULT,
            placement: PlacementConfig::default(),
            celebration: CelebrationConfig::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refusal_images.is_empty() {
            return Err(ConfigError::NoRefusalImages);
        }
        if self.refusal_texts.len() + 1 != self.refusal_images.len() {
            return Err(ConfigError::TableMismatch {
                texts: self.refusal_texts.len(),
                images: self.refusal_images.len(),
            });
        }
        if self.scale_table.is_empty() {
            return Err(ConfigError::EmptyScaleTable);
        }
        for (index, value) in self.scale_table.iter().copied().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidScale { index, value });
            }
        }
        if self.debounce_ms < 0.0 || !self.debounce_ms.is_finite() {
            return Err(ConfigError::InvalidValue("debounce_ms"));
        }
        let placement = &self.placement;
        if placement.max_attempts == 0 {
            return Err(ConfigError::InvalidValue("placement.max_attempts"));
        }
        if placement.edge_padding < 0.0 || placement.overlap_buffer < 0.0 {
            return Err(ConfigError::InvalidValue("placement.edge_padding"));
        }
        if placement.fallback_width <= 0.0 || placement.fallback_height <= 0.0 {
            return Err(ConfigError::InvalidValue("placement.fallback_size"));
        }
        let celebration = &self.celebration;
        if !(celebration.duration_ms > 0.0) {
            return Err(ConfigError::InvalidValue("celebration.duration_ms"));
        }
        if celebration.interval_ms == 0 {
            return Err(ConfigError::InvalidValue("celebration.interval_ms"));
        }
        if celebration.initial_particles < 0.0 {
            return Err(ConfigError::InvalidValue("celebration.initial_particles"));
        }
        for (name, band) in [
            ("celebration.left_band", celebration.left_band),
            ("celebration.right_band", celebration.right_band),
        ] {
            if !(band[0] < band[1]) {
                return Err(ConfigError::InvalidValue(name));
            }
        }
        Ok(())
    }

    /// Number of refusals after which the negative button is gone for good.
    pub fn max_refusals(&self) -> u32 {
        self.refusal_images.len() as u32
    }

    pub fn max_scale(&self) -> f64 {
        self.scale_table
            .iter()
            .copied()
            .reduce(f64::max)
            .unwrap_or(1.0)
    }

    /// Scale for the affirmative button after `step` refusals; past the end of
    /// the table this is the largest configured scale.
    pub fn scale_for(&self, step: u32) -> f64 {
        if step == 0 {
            return 1.0;
        }
        self.scale_table
            .get(step as usize - 1)
            .copied()
            .unwrap_or_else(|| self.max_scale())
    }

    pub fn refusal_text(&self, step: u32) -> Option<&str> {
        let index = (step as usize).checked_sub(1)?;
        self.refusal_texts.get(index).map(String::as_str)
    }

    pub fn refusal_image(&self, step: u32) -> Option<&str> {
        let index = (step as usize).checked_sub(1)?;
        self.refusal_images.get(index).map(String::as_str)
    }

    pub fn alt_for(&self, src: &str) -> &'static str {
        asset_by_src(src)
            .map(|entry| entry.alt)
            .unwrap_or(REFUSAL_ALT)
    }

    /// Every image the widget can show, in display order.
    pub fn asset_sources(&self) -> Vec<String> {
        let mut sources = self.refusal_images.clone();
        sources.push(self.accept_image.clone());
        sources
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    NoRefusalImages,
    TableMismatch { texts: usize, images: usize },
    EmptyScaleTable,
    InvalidScale { index: usize, value: f64 },
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(message) => write!(f, "invalid widget config: {message}"),
            ConfigError::NoRefusalImages => write!(f, "at least one refusal image is required"),
            ConfigError::TableMismatch { texts, images } => write!(
                f,
                "expected one more refusal image than texts, got {texts} texts and {images} images"
            ),
            ConfigError::EmptyScaleTable => write!(f, "scale table cannot be empty"),
            ConfigError::InvalidScale { index, value } => {
                write!(f, "scale {value} at position {index} must be positive")
            }
            ConfigError::InvalidValue(field) => write!(f, "invalid value for {field}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = WidgetConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_refusals(), 4);
        assert_eq!(config.max_scale(), 1.6);
    }

    #[test]
    fn scale_lookup_falls_back_to_max() {
        let config = WidgetConfig::default();
        assert_eq!(config.scale_for(0), 1.0);
        assert_eq!(config.scale_for(1), 1.2);
        assert_eq!(config.scale_for(3), 1.6);
        assert_eq!(config.scale_for(4), 1.6);
        assert_eq!(config.scale_for(40), 1.6);
    }

    #[test]
    fn text_and_image_tables_are_one_based() {
        let config = WidgetConfig::default();
        assert_eq!(config.refusal_text(0), None);
        assert_eq!(config.refusal_text(1), Some("Are you sure? 🤨"));
        assert_eq!(config.refusal_text(4), None);
        assert_eq!(config.refusal_image(4), Some("images/no4.jpg"));
        assert_eq!(config.refusal_image(5), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let raw = r#"
            prompt = "Pizza tonight?"
            debounce_ms = 150.0

            [placement]
            policy = "viewport"
        "#;
        let config = WidgetConfig::from_toml_str(raw).expect("config");
        assert_eq!(config.prompt, "Pizza tonight?");
        assert_eq!(config.debounce_ms, 150.0);
        assert_eq!(config.placement.policy, PlacementPolicy::Viewport);
        assert_eq!(config.placement.edge_padding, EDGE_PADDING_DEFAULT);
        assert_eq!(config.celebration, CelebrationConfig::default());
        assert_eq!(config.refusal_texts.len(), 3);
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let raw = r#"
            refusal_texts = ["one", "two"]
            refusal_images = ["a.jpg", "b.jpg"]
        "#;
        let err = WidgetConfig::from_toml_str(raw).unwrap_err();
        assert_eq!(err, ConfigError::TableMismatch { texts: 2, images: 2 });
    }

    #[test]
    fn empty_scale_table_is_rejected() {
        let err = WidgetConfig::from_toml_str("scale_table = []").unwrap_err();
        assert_eq!(err, ConfigError::EmptyScaleTable);
        let err = WidgetConfig::from_toml_str("scale_table = [1.2, -1.0]").unwrap_err();
        assert_eq!(err, ConfigError::InvalidScale { index: 1, value: -1.0 });
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let err = WidgetConfig::from_toml_str("prompt = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid widget config"));
    }

    #[test]
    fn policy_parse_accepts_aliases() {
        assert_eq!(PlacementPolicy::parse(" Viewport "), Some(PlacementPolicy::Viewport));
        assert_eq!(PlacementPolicy::parse("naive"), Some(PlacementPolicy::Viewport));
        assert_eq!(PlacementPolicy::parse("zones"), Some(PlacementPolicy::Zones));
        assert_eq!(PlacementPolicy::parse("teleport"), None);
    }
}
