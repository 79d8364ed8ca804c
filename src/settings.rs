//! Player settings and preferences
//!
//! Persisted by the host (LocalStorage in the browser); the core only reads
//! the values that change simulation output.

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};

/// Performance preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    Low,
    Medium,
    #[default]
    High,
}

impl PerformanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceMode::Low => "Low",
            PerformanceMode::Medium => "Medium",
            PerformanceMode::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(PerformanceMode::Low),
            "medium" | "med" => Some(PerformanceMode::Medium),
            "high" => Some(PerformanceMode::High),
            _ => None,
        }
    }

    /// Crash chart resolution for this preset
    pub fn chart_points(&self) -> usize {
        match self {
            PerformanceMode::Low => 100,
            PerformanceMode::Medium => 200,
            PerformanceMode::High => 300,
        }
    }
}

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub performance_mode: PerformanceMode,
    /// Frame delta multiplier (0.5 - 2.0)
    pub animation_speed: f64,

    // === Decoration (host-side) ===
    pub show_effects: bool,
    pub sound_enabled: bool,
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            performance_mode: PerformanceMode::High,
            animation_speed: 1.0,
            show_effects: true,
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

impl Settings {
    pub const MIN_ANIMATION_SPEED: f64 = 0.5;
    pub const MAX_ANIMATION_SPEED: f64 = 2.0;

    pub fn from_preset(mode: PerformanceMode) -> Self {
        Self {
            performance_mode: mode,
            ..Self::default()
        }
    }

    /// Parse host-stored JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| ArcadeError::invalid(format!("settings: {e}")))?;
        Ok(settings.normalized())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ArcadeError::invalid(format!("settings: {e}")))
    }

    /// Clamp animation speed into range (NaN falls back to 1.0)
    pub fn normalized(mut self) -> Self {
        self.animation_speed = if self.animation_speed.is_nan() {
            1.0
        } else {
            self.animation_speed
                .clamp(Self::MIN_ANIMATION_SPEED, Self::MAX_ANIMATION_SPEED)
        };
        self
    }

    pub fn chart_points(&self) -> usize {
        self.performance_mode.chart_points()
    }
}
