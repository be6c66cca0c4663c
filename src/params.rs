//! Visual knobs and effect configuration.
//!
//! [`VisualParameters`] is the flat set of shading knobs read by the frame
//! bridge. [`Knob`] names each numeric control together with its valid range,
//! and setting a knob through [`VisualParameters::set`] or
//! [`GlobeConfig::set`] clamps into that range.
//!
//! [`GlobeConfig`] bundles the knobs with the clock and touch settings and can
//! be stored as JSON:
//!
//! ```ignore
//! let config = GlobeConfig::load("globe.json")?.validated();
//! config.save("globe-copy.json")?;
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::error::ConfigError;

/// Shading knobs. Read-only to the physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualParameters {
    /// Ambient flow amplitude.
    pub strength: f32,
    /// Ambient flow speed. Multiplied by 5 before use.
    pub frequency: f32,
    /// Flow-noise jitter of the sampling coordinates.
    pub noise: f32,
    /// Rim thickness and refraction weight.
    pub edge: f32,
    /// Rim light and specular highlight intensity.
    pub light: f32,
    /// Edge glow intensity.
    pub glow: f32,
    /// Lens distortion toward the rim.
    pub lens: f32,
    /// Mirrored refraction sample at the edge.
    pub refraction: bool,
}

impl VisualParameters {
    pub const DEFAULT: Self = Self {
        strength: 0.05,
        frequency: 0.24,
        noise: 0.5,
        edge: 0.1,
        light: 0.25,
        glow: 0.5,
        lens: 0.1,
        refraction: true,
    };

    /// Restore the documented defaults.
    pub fn reset(&mut self) {
        *self = Self::DEFAULT;
    }

    /// Current value of a knob. `Knob::Speed` is not part of this set and
    /// reads as `None`.
    pub fn get(&self, knob: Knob) -> Option<f32> {
        match knob {
            Knob::Speed => None,
            Knob::Strength => Some(self.strength),
            Knob::Frequency => Some(self.frequency),
            Knob::Noise => Some(self.noise),
            Knob::Edge => Some(self.edge),
            Knob::Light => Some(self.light),
            Knob::Glow => Some(self.glow),
            Knob::Lens => Some(self.lens),
        }
    }

    /// Set a knob, clamped to its range. Non-finite values are ignored.
    pub fn set(&mut self, knob: Knob, value: f32) {
        if !value.is_finite() {
            return;
        }
        let value = knob.clamp(value);
        match knob {
            Knob::Speed => {}
            Knob::Strength => self.strength = value,
            Knob::Frequency => self.frequency = value,
            Knob::Noise => self.noise = value,
            Knob::Edge => self.edge = value,
            Knob::Light => self.light = value,
            Knob::Glow => self.glow = value,
            Knob::Lens => self.lens = value,
        }
    }

    /// Copy with every knob clamped to its range.
    pub fn validated(&self) -> Self {
        let mut out = Self {
            refraction: self.refraction,
            ..Self::DEFAULT
        };
        for knob in Knob::VISUAL {
            if let Some(v) = self.get(knob) {
                out.set(knob, v);
            }
        }
        out
    }
}

impl Default for VisualParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A numeric control exposed to the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Knob {
    Speed,
    Strength,
    Frequency,
    Noise,
    Edge,
    Light,
    Glow,
    Lens,
}

impl Knob {
    pub const ALL: [Knob; 8] = [
        Knob::Speed,
        Knob::Strength,
        Knob::Frequency,
        Knob::Noise,
        Knob::Edge,
        Knob::Light,
        Knob::Glow,
        Knob::Lens,
    ];

    /// The knobs stored in [`VisualParameters`].
    pub const VISUAL: [Knob; 7] = [
        Knob::Strength,
        Knob::Frequency,
        Knob::Noise,
        Knob::Edge,
        Knob::Light,
        Knob::Glow,
        Knob::Lens,
    ];

    pub fn range(&self) -> RangeInclusive<f32> {
        match self {
            Knob::Speed => 0.01..=2.0,
            Knob::Strength | Knob::Frequency | Knob::Edge | Knob::Light | Knob::Glow => {
                0.01..=1.0
            }
            Knob::Noise | Knob::Lens => 0.0..=1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Knob::Speed => "Speed",
            Knob::Strength => "Strength",
            Knob::Frequency => "Frequency",
            Knob::Noise => "Noise",
            Knob::Edge => "Edge",
            Knob::Light => "Light",
            Knob::Glow => "Glow",
            Knob::Lens => "Lens",
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

fn default_speed() -> f32 {
    0.26
}

fn default_true() -> bool {
    true
}

/// Complete effect configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobeConfig {
    /// Ambient clock speed.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Whether the ambient clock runs.
    #[serde(default = "default_true")]
    pub animate: bool,
    /// Whether pointer input reaches the interaction state machine.
    #[serde(default = "default_true")]
    pub touch_enabled: bool,
    #[serde(default)]
    pub visual: VisualParameters,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            animate: true,
            touch_enabled: true,
            visual: VisualParameters::DEFAULT,
        }
    }
}

impl GlobeConfig {
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.set(Knob::Speed, speed);
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_touch(mut self, enabled: bool) -> Self {
        self.touch_enabled = enabled;
        self
    }

    pub fn with_visual(mut self, visual: VisualParameters) -> Self {
        self.visual = visual.validated();
        self
    }

    /// Set any knob, including speed, clamped to its range.
    pub fn set(&mut self, knob: Knob, value: f32) {
        match knob {
            Knob::Speed if value.is_finite() => self.speed = knob.clamp(value),
            Knob::Speed => {}
            _ => self.visual.set(knob, value),
        }
    }

    pub fn get(&self, knob: Knob) -> f32 {
        match knob {
            Knob::Speed => self.speed,
            _ => self.visual.get(knob).unwrap_or_default(),
        }
    }

    /// Copy with every numeric field clamped to its range.
    pub fn validated(&self) -> Self {
        let speed = if self.speed.is_finite() {
            Knob::Speed.clamp(self.speed)
        } else {
            default_speed()
        };
        Self {
            speed,
            animate: self.animate,
            touch_enabled: self.touch_enabled,
            visual: self.visual.validated(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON. Missing fields take their defaults; values are not
    /// clamped until [`validated`](Self::validated) is called.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let v = VisualParameters::default();
        assert_eq!(v.strength, 0.05);
        assert_eq!(v.frequency, 0.24);
        assert_eq!(v.noise, 0.5);
        assert_eq!(v.edge, 0.1);
        assert_eq!(v.light, 0.25);
        assert_eq!(v.glow, 0.5);
        assert_eq!(v.lens, 0.1);
        assert!(v.refraction);
    }

    #[test]
    fn test_set_clamps_to_range() {
        let mut v = VisualParameters::default();
        v.set(Knob::Strength, -3.0);
        assert_eq!(v.strength, 0.01);
        v.set(Knob::Noise, -3.0);
        assert_eq!(v.noise, 0.0);
        v.set(Knob::Lens, 7.0);
        assert_eq!(v.lens, 1.0);
        v.set(Knob::Glow, f32::NAN);
        assert_eq!(v.glow, 0.5);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut v = VisualParameters::default();
        v.set(Knob::Edge, 0.9);
        v.refraction = false;
        v.reset();
        assert_eq!(v, VisualParameters::DEFAULT);
    }

    #[test]
    fn test_speed_knob() {
        let config = GlobeConfig::default().with_speed(5.0);
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.get(Knob::Speed), 2.0);
    }

    #[test]
    fn test_validated_clamps_everything() {
        let config = GlobeConfig {
            speed: -1.0,
            visual: VisualParameters {
                frequency: 40.0,
                light: -2.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let v = config.validated();
        assert_eq!(v.speed, 0.01);
        assert_eq!(v.visual.frequency, 1.0);
        assert_eq!(v.visual.light, 0.01);
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let config: GlobeConfig = serde_json::from_str(r#"{ "visual": { "glow": 0.9 } }"#)
            .expect("partial config should parse");
        assert_eq!(config.speed, 0.26);
        assert!(config.animate);
        assert!(config.touch_enabled);
        assert_eq!(config.visual.glow, 0.9);
        assert_eq!(config.visual.strength, 0.05);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("liquid_globe_params_test.json");
        let config = GlobeConfig::default().with_animate(false).with_speed(1.5);
        config.save(&path).expect("save");
        let loaded = GlobeConfig::load(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_knob_ranges() {
        for knob in Knob::ALL {
            let range = knob.range();
            assert!(range.start() < range.end(), "{} has empty range", knob.label());
        }
    }
}
