//! Panel settings
//!
//! Raw slider values as the page shows them, persisted separately in
//! LocalStorage. Conversion into [`SimParams`] applies the panel scaling and
//! clamps anything out of range.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sim::{Shape, SimParams};

/// Shape selector on the sandbox panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShapeChoice {
    #[default]
    Circle,
    Rect,
    Triangle,
}

impl ShapeChoice {
    pub fn as_str(&self) -> &'static str {
        self.shape().as_str()
    }

    pub fn shape(&self) -> Shape {
        match self {
            ShapeChoice::Circle => Shape::Circle,
            ShapeChoice::Rect => Shape::Rect,
            ShapeChoice::Triangle => Shape::Triangle,
        }
    }
}

/// Parses the shape selector values (`circle`, `rect`, `triangle`)
impl FromStr for ShapeChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circle" => Ok(ShapeChoice::Circle),
            "rect" | "rectangle" => Ok(ShapeChoice::Rect),
            "triangle" => Ok(ShapeChoice::Triangle),
            other => Err(format!("unknown shape: {other}")),
        }
    }
}

/// Slider scaling applied by the network panel
pub const SPEED_SLIDER_SCALE: f32 = 0.4;
/// Slider scaling applied by the sandbox panel
pub const GRAVITY_SLIDER_SCALE: f32 = 0.5;

/// Panel settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Particle network ===
    /// Number of particles (slider value, may be out of range)
    pub particle_count: f64,
    /// Speed slider (base speed = value × 0.4)
    pub particle_speed: f32,
    /// Connection distance in pixels
    pub link_distance: f32,

    // === Physics sandbox ===
    /// Gravity slider (gravity = value × 0.5)
    pub gravity: f32,
    /// Bounce (restitution)
    pub bounce: f32,
    /// Shape for click spawns, following the shape selector
    pub shape: ShapeChoice,

    /// Spawn RNG seed (host clock when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particle_count: 80.0,
            particle_speed: 3.0,
            link_distance: 120.0,

            gravity: 1.0,
            bounce: 0.7,
            shape: ShapeChoice::Circle,

            seed: None,
        }
    }
}

impl Settings {
    /// Parameters for the particle network panel
    pub fn network_params(&self) -> SimParams {
        SimParams {
            target_count: SimParams::count_from_raw(self.particle_count),
            speed: self.particle_speed * SPEED_SLIDER_SCALE,
            link_distance: self.link_distance,
            ..Default::default()
        }
        .sanitized()
    }

    /// Parameters for the physics sandbox panel
    pub fn sandbox_params(&self) -> SimParams {
        SimParams {
            target_count: 0,
            gravity: self.gravity * GRAVITY_SLIDER_SCALE,
            restitution: self.bounce,
            ..Default::default()
        }
        .sanitized()
    }

    /// Parameters for the hero starfield (not user-tunable)
    pub fn starfield_params(&self) -> SimParams {
        SimParams::default()
    }

    /// Decode settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "beyond_sim_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring corrupt settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let settings = Settings::default();
        let network = settings.network_params();
        assert_eq!(network.target_count, 80);
        assert!((network.speed - 1.2).abs() < 1e-6);
        assert_eq!(network.link_distance, 120.0);

        let sandbox = settings.sandbox_params();
        assert_eq!(sandbox.gravity, 0.5);
        assert_eq!(sandbox.restitution, 0.7);
    }

    #[test]
    fn test_malformed_sliders_clamped() {
        let settings = Settings {
            particle_count: -12.0,
            particle_speed: f32::NAN,
            bounce: 3.0,
            gravity: -1.0,
            ..Default::default()
        };
        let network = settings.network_params();
        assert_eq!(network.target_count, 0);
        assert!(network.speed.is_finite());

        let sandbox = settings.sandbox_params();
        assert_eq!(sandbox.restitution, 1.0);
        assert_eq!(sandbox.gravity, 0.0);
    }

    #[test]
    fn test_json_partial() {
        let settings = Settings::from_json(r#"{"gravity": 2.0, "shape": "Rect"}"#).unwrap();
        assert_eq!(settings.gravity, 2.0);
        assert_eq!(settings.shape, ShapeChoice::Rect);
        assert_eq!(settings.particle_count, 80.0);
    }

    #[test]
    fn test_stored_count_capped() {
        let settings = Settings::from_json(r#"{"particle_count": 1e12}"#).unwrap();
        assert_eq!(settings.network_params().target_count, crate::consts::MAX_TARGET_COUNT);
    }

    #[test]
    fn test_spawn_shape_follows_choice() {
        let settings = Settings::from_json(r#"{"shape": "Triangle"}"#).unwrap();
        assert_eq!(settings.shape.shape(), Shape::Triangle);
        assert_eq!(Settings::default().shape.shape(), Shape::Circle);
    }

    #[test]
    fn test_json_corrupt() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_shape_choice_from_str() {
        assert_eq!("Triangle".parse::<ShapeChoice>(), Ok(ShapeChoice::Triangle));
        assert_eq!("rect".parse::<ShapeChoice>(), Ok(ShapeChoice::Rect));
        assert!("blob".parse::<ShapeChoice>().is_err());
        assert_eq!(ShapeChoice::Circle.as_str(), "circle");
    }
}
