//! Simulation settings
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults in `consts`.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::geometry::PlayArea;

/// What to do once the last level has been cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LevelExhaustion {
    /// Start over from the first level
    LoopToFirst,
    /// End the session
    #[default]
    Stop,
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Play area ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between paddle and bottom edge
    pub paddle_margin: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Pixels per second
    pub ball_speed: f32,
    /// Degrees clockwise from straight up
    pub start_heading: f32,

    // === Timing ===
    /// Ticks per second
    pub tick_rate: u32,
    /// Use this frame time instead of measuring wall-clock time
    pub fixed_frame_time: Option<f32>,
    /// Measured frame times are clamped to this
    pub max_frame_time: f32,

    // === Session ===
    /// RNG seed for relaunch headings
    pub seed: u64,
    pub start_level: u32,
    pub on_last_level: LevelExhaustion,
    /// Read `level{n}.json` from here instead of the built-in layouts
    pub level_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_margin: PADDLE_MARGIN,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            start_heading: BALL_START_HEADING,

            tick_rate: TICK_RATE,
            fixed_frame_time: None,
            max_frame_time: MAX_FRAME_TIME,

            seed: 0x5eed,
            start_level: 1,
            on_last_level: LevelExhaustion::Stop,
            level_dir: None,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("ball_speed", self.ball_speed)?;
        positive("max_frame_time", self.max_frame_time)?;
        if let Some(dt) = self.fixed_frame_time {
            positive("fixed_frame_time", dt)?;
        }

        if self.paddle_width > self.field_width {
            return Err(SettingsError::Invalid {
                field: "paddle_width",
                reason: "wider than the play area".into(),
            });
        }
        if self.tick_rate == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_rate",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn play_area(&self) -> PlayArea {
        PlayArea::new(self.field_width, self.field_height)
    }

    pub fn paddle_size(&self) -> Vec2 {
        Vec2::new(self.paddle_width, self.paddle_height)
    }

    /// Nominal seconds between ticks
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.tick_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "ball_speed": 300, "on_last_level": "loop_to_first" }"#)
                .unwrap();
        assert_eq!(settings.ball_speed, 300.0);
        assert_eq!(settings.on_last_level, LevelExhaustion::LoopToFirst);
        assert_eq!(settings.field_width, FIELD_WIDTH);
        assert_eq!(settings.tick_rate, TICK_RATE);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            ball_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "ball_speed", .. })
        ));

        let settings = Settings {
            paddle_width: 1000.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            tick_rate: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let settings = Settings::load_or_default(Path::new("/nonexistent/breakout-settings.json"));
        assert_eq!(settings.start_level, 1);
    }

    #[test]
    fn test_tick_interval() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval(), std::time::Duration::from_millis(25));
    }
}
