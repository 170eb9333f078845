//! Snap and scale configuration, plus the typed key/value store hosts bind
//! their persisted settings through.
//!
//! Configuration values are read fresh every frame; nothing here is cached
//! across ticks. Invalid values are clamped silently, never surfaced as
//! failures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Grid and rotation snapping settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Enable grid snapping while a placement session is active.
    pub grid_enabled: bool,
    /// Grid size in meters (in-plane axes, relative to the reference frame).
    pub grid_size: f32,
    /// How much a single adjustment changes the grid size.
    pub grid_size_step: f32,
    /// Also snap targets that may sit on restricted (non-floor) surfaces.
    pub snap_on_restricted_surfaces: bool,
    /// Enable rotation snapping while a placement session is active.
    pub rotation_enabled: bool,
    /// Rotation snap angle in degrees.
    pub rotation_step_degrees: f32,
    /// How much a single adjustment changes the rotation snap angle.
    pub rotation_step_increment: f32,
}

/// Smallest rotation snap angle the adjustment keybinds may reach.
pub const MIN_ROTATION_STEP_DEGREES: f32 = 1.0;

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            grid_enabled: true,
            grid_size: 0.5,
            grid_size_step: 0.05,
            snap_on_restricted_surfaces: false,
            rotation_enabled: true,
            rotation_step_degrees: 45.0,
            rotation_step_increment: 15.0,
        }
    }
}

impl SnapConfig {
    /// Sets the grid size, floored at one step increment.
    pub fn set_grid_size(&mut self, size: f32) {
        self.grid_size = size.max(self.grid_size_step);
    }

    pub fn increase_grid_size(&mut self) -> f32 {
        self.set_grid_size(self.grid_size + self.grid_size_step);
        self.grid_size
    }

    /// Decreasing below one step increment is disallowed; the size floors
    /// at the step value.
    pub fn decrease_grid_size(&mut self) -> f32 {
        self.set_grid_size(self.grid_size - self.grid_size_step);
        self.grid_size
    }

    pub fn increase_rotation_step(&mut self) -> f32 {
        self.rotation_step_degrees += self.rotation_step_increment;
        self.rotation_step_degrees
    }

    pub fn decrease_rotation_step(&mut self) -> f32 {
        self.rotation_step_degrees =
            MIN_ROTATION_STEP_DEGREES.max(self.rotation_step_degrees - self.rotation_step_increment);
        self.rotation_step_degrees
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.grid_enabled = !self.grid_enabled;
        self.grid_enabled
    }

    pub fn toggle_rotation(&mut self) -> bool {
        self.rotation_enabled = !self.rotation_enabled;
        self.rotation_enabled
    }

    /// Binds every snap entry in `store` with its default and reads the
    /// current values.
    pub fn bind(store: &mut ConfigStore) -> Self {
        let defaults = Self::default();
        Self {
            grid_enabled: store.bind_bool(
                "Grid",
                "Enabled",
                defaults.grid_enabled,
                "Enable grid snapping while in build mode.",
            ),
            grid_size: store.bind_float(
                "Grid",
                "GridSize",
                defaults.grid_size,
                "Grid size in meters (in-plane axes, relative to the reference frame).",
            ),
            grid_size_step: store.bind_float(
                "Grid",
                "GridSizeStep",
                defaults.grid_size_step,
                "How much to change grid size when using the keybinds.",
            ),
            snap_on_restricted_surfaces: store.bind_bool(
                "Grid",
                "SnapOnRestrictedSurfaces",
                defaults.snap_on_restricted_surfaces,
                "If true, also snap when placing on restricted surfaces.",
            ),
            rotation_enabled: store.bind_bool(
                "Rotation",
                "Enabled",
                defaults.rotation_enabled,
                "Enable rotation snapping while in build mode.",
            ),
            rotation_step_degrees: store.bind_angle(
                "Rotation",
                "AngleStep",
                defaults.rotation_step_degrees,
                "Rotation snap angle in degrees.",
            ),
            rotation_step_increment: store.bind_angle(
                "Rotation",
                "AngleStepIncrement",
                defaults.rotation_step_increment,
                "How much to change rotation snap angle when using keybinds.",
            ),
        }
    }
}

/// Scale multiplier bounds and step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Minimum allowed scale multiplier.
    pub min: f32,
    /// Maximum allowed scale multiplier.
    pub max: f32,
    /// Scale step as a fraction (0.05 = 5%) per adjustment.
    pub step_percent: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            step_percent: 0.05,
        }
    }
}

impl ScaleConfig {
    pub fn bind(store: &mut ConfigStore) -> Self {
        let defaults = Self::default();
        Self {
            min: store.bind_float(
                "Scale",
                "Min",
                defaults.min,
                "Minimum allowed scale multiplier.",
            ),
            max: store.bind_float(
                "Scale",
                "Max",
                defaults.max,
                "Maximum allowed scale multiplier.",
            ),
            step_percent: store.bind_float(
                "Scale",
                "StepPercent",
                defaults.step_percent,
                "Scale step as percentage (0.05 = 5%) per key press.",
            ),
        }
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConfigValue {
    Bool(bool),
    Float(f32),
    AngleDeg(f32),
}

impl ConfigValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
            Self::AngleDeg(_) => "angle",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("config key {key} holds a {actual}, expected {expected}")]
    TypeMismatch {
        key: String,
        actual: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One bound configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub section: String,
    pub key: String,
    pub value: ConfigValue,
    pub default: ConfigValue,
    pub description: String,
}

/// Typed key/value settings store.
///
/// Entries are bound once with a section, key, default and description; the
/// host may overwrite values at any time and the core re-reads them live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigStore {
    entries: BTreeMap<String, ConfigEntry>,
}

fn full_key(section: &str, key: &str) -> String {
    format!("{section}.{key}")
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(
        &mut self,
        section: &str,
        key: &str,
        default: ConfigValue,
        description: &str,
    ) -> ConfigValue {
        let id = full_key(section, key);
        let entry = self.entries.entry(id.clone()).or_insert_with(|| ConfigEntry {
            section: section.to_string(),
            key: key.to_string(),
            value: default,
            default,
            description: description.to_string(),
        });
        if entry.value.kind() != default.kind() {
            tracing::warn!(
                "[config] {id} held a {}, rebinding to default {default:?}",
                entry.value.kind()
            );
            entry.value = default;
        }
        entry.default = default;
        entry.value
    }

    pub fn bind_bool(&mut self, section: &str, key: &str, default: bool, description: &str) -> bool {
        match self.bind(section, key, ConfigValue::Bool(default), description) {
            ConfigValue::Bool(v) => v,
            _ => default,
        }
    }

    pub fn bind_float(&mut self, section: &str, key: &str, default: f32, description: &str) -> f32 {
        match self.bind(section, key, ConfigValue::Float(default), description) {
            ConfigValue::Float(v) => v,
            _ => default,
        }
    }

    pub fn bind_angle(&mut self, section: &str, key: &str, default: f32, description: &str) -> f32 {
        match self.bind(section, key, ConfigValue::AngleDeg(default), description) {
            ConfigValue::AngleDeg(v) => v,
            _ => default,
        }
    }

    fn get(&self, section: &str, key: &str) -> Result<&ConfigEntry, ConfigError> {
        let id = full_key(section, key);
        self.entries.get(&id).ok_or(ConfigError::UnknownKey(id))
    }

    pub fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        match self.get(section, key)?.value {
            ConfigValue::Bool(v) => Ok(v),
            other => Err(ConfigError::TypeMismatch {
                key: full_key(section, key),
                actual: other.kind(),
                expected: "bool",
            }),
        }
    }

    pub fn get_float(&self, section: &str, key: &str) -> Result<f32, ConfigError> {
        match self.get(section, key)?.value {
            ConfigValue::Float(v) => Ok(v),
            other => Err(ConfigError::TypeMismatch {
                key: full_key(section, key),
                actual: other.kind(),
                expected: "float",
            }),
        }
    }

    pub fn get_angle(&self, section: &str, key: &str) -> Result<f32, ConfigError> {
        match self.get(section, key)?.value {
            ConfigValue::AngleDeg(v) => Ok(v),
            other => Err(ConfigError::TypeMismatch {
                key: full_key(section, key),
                actual: other.kind(),
                expected: "angle",
            }),
        }
    }

    /// Overwrites an existing entry. The new value must match the bound type.
    pub fn set(&mut self, section: &str, key: &str, value: ConfigValue) -> Result<(), ConfigError> {
        let id = full_key(section, key);
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| ConfigError::UnknownKey(id.clone()))?;
        if entry.value.kind() != value.kind() {
            return Err(ConfigError::TypeMismatch {
                key: id,
                actual: value.kind(),
                expected: entry.value.kind(),
            });
        }
        entry.value = value;
        Ok(())
    }

    /// Resets every entry to its bound default.
    pub fn reset_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.value = entry.default;
        }
    }

    /// Serializes all entries to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Applies values from a `{"Section.Key": <bool|number>, ...}` document.
    /// Unknown keys are skipped with a warning; returns how many entries were
    /// applied.
    pub fn load_json(&mut self, json: &str) -> Result<usize, ConfigError> {
        #[allow(clippy::cast_possible_truncation)]
        fn to_f32(n: &serde_json::Number) -> f32 {
            n.as_f64().unwrap_or_default() as f32
        }

        let doc: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut applied = 0;
        for (id, raw) in doc {
            let Some(entry) = self.entries.get_mut(&id) else {
                tracing::warn!("[config] skipping unknown key {id}");
                continue;
            };
            let value = match (&entry.value, &raw) {
                (ConfigValue::Bool(_), serde_json::Value::Bool(v)) => ConfigValue::Bool(*v),
                (ConfigValue::Float(_), serde_json::Value::Number(n)) => {
                    ConfigValue::Float(to_f32(n))
                }
                (ConfigValue::AngleDeg(_), serde_json::Value::Number(n)) => {
                    ConfigValue::AngleDeg(to_f32(n))
                }
                _ => {
                    tracing::warn!("[config] skipping {id}: value does not match bound type");
                    continue;
                }
            };
            entry.value = value;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_floors_at_step() {
        let mut config = SnapConfig {
            grid_size: 0.1,
            grid_size_step: 0.05,
            ..SnapConfig::default()
        };

        assert!((config.decrease_grid_size() - 0.05).abs() < 1e-6);
        // Further decreases stay floored at one step increment
        assert!((config.decrease_grid_size() - 0.05).abs() < 1e-6);

        config.set_grid_size(-3.0);
        assert!((config.grid_size - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_step_floors_at_one_degree() {
        let mut config = SnapConfig {
            rotation_step_degrees: 15.0,
            rotation_step_increment: 15.0,
            ..SnapConfig::default()
        };

        assert!((config.decrease_rotation_step() - MIN_ROTATION_STEP_DEGREES).abs() < 1e-6);
        assert!((config.decrease_rotation_step() - MIN_ROTATION_STEP_DEGREES).abs() < 1e-6);
        assert!((config.increase_rotation_step() - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_toggles() {
        let mut config = SnapConfig::default();
        assert!(!config.toggle_grid());
        assert!(config.toggle_grid());
        assert!(!config.toggle_rotation());
    }

    #[test]
    fn test_bind_inserts_defaults_once() {
        let mut store = ConfigStore::new();
        let config = SnapConfig::bind(&mut store);
        assert!((config.grid_size - 0.5).abs() < 1e-6);
        assert_eq!(store.len(), 7);

        // A host override survives a later re-bind
        store
            .set("Grid", "GridSize", ConfigValue::Float(1.0))
            .unwrap();
        let config = SnapConfig::bind(&mut store);
        assert!((config.grid_size - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_typed_getters_report_mismatch() {
        let mut store = ConfigStore::new();
        store.bind_bool("Grid", "Enabled", true, "");

        assert!(store.get_bool("Grid", "Enabled").unwrap());
        assert!(matches!(
            store.get_float("Grid", "Enabled"),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!(matches!(
            store.get_bool("Grid", "Missing"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let mut store = ConfigStore::new();
        store.bind_float("Scale", "Max", 3.0, "");

        assert!(store.set("Scale", "Max", ConfigValue::Float(4.0)).is_ok());
        assert!(matches!(
            store.set("Scale", "Max", ConfigValue::Bool(true)),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!((store.get_float("Scale", "Max").unwrap() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_json_overrides() {
        let mut store = ConfigStore::new();
        SnapConfig::bind(&mut store);

        let applied = store
            .load_json(r#"{"Grid.GridSize": 0.25, "Grid.Enabled": false, "Nope.Key": 1.0}"#)
            .unwrap();
        assert_eq!(applied, 2);

        let config = SnapConfig::bind(&mut store);
        assert!((config.grid_size - 0.25).abs() < 1e-6);
        assert!(!config.grid_enabled);
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = ConfigStore::new();
        ScaleConfig::bind(&mut store);
        let json = store.to_json().unwrap();
        assert!(json.contains("Scale.StepPercent"));

        let parsed: BTreeMap<String, ConfigEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), store.len());
    }

    #[test]
    fn test_reset_all() {
        let mut store = ConfigStore::new();
        ScaleConfig::bind(&mut store);
        store.set("Scale", "Min", ConfigValue::Float(0.5)).unwrap();

        store.reset_all();
        let config = ScaleConfig::bind(&mut store);
        assert!((config.min - 0.1).abs() < 1e-6);
    }
}
