//! Editor configuration.

use crate::error::{EngineError, EngineResult};
use crate::scene::ComponentKind;
use crate::snap::SnapSettings;
use serde::{Deserialize, Serialize};

/// Tunables for the interaction engine. Distances are in device pixels
/// unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub snap: SnapSettings,
    /// Pointer travel before a press becomes a drag or create.
    pub drag_threshold: f64,
    /// Minimum interval between processed pointer moves; 0 disables throttling.
    pub move_throttle_ms: u64,
    /// Side of the square resize-handle hit box.
    pub handle_hit_size: f64,
    /// Arrow-key nudge, canvas pixels.
    pub nudge_step: f64,
    /// Shift+arrow nudge, canvas pixels.
    pub nudge_step_large: f64,
    /// Offset applied to duplicates, canvas pixels.
    pub duplicate_offset: f64,
    /// Kind given to components created by dragging.
    pub creation_kind: ComponentKind,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapSettings::default(),
            drag_threshold: 3.0,
            move_throttle_ms: 16,
            handle_hit_size: 10.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            duplicate_offset: 20.0,
            creation_kind: ComponentKind::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges. Invalid values are logged and reported, never clamped.
    pub fn validate(&self) -> EngineResult<()> {
        let checks = [
            (self.snap.threshold > 0.0, "snap threshold must be positive"),
            (self.drag_threshold > 0.0, "drag threshold must be positive"),
            (self.handle_hit_size > 0.0, "handle hit size must be positive"),
            (self.nudge_step >= 0.0, "nudge step must not be negative"),
            (self.nudge_step_large >= 0.0, "large nudge step must not be negative"),
            (self.duplicate_offset >= 0.0, "duplicate offset must not be negative"),
        ];
        for (ok, message) in checks {
            if !ok {
                log::warn!("Rejected editor config: {message}");
                return Err(EngineError::InvalidConfig(message.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::GridSpacing;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.drag_threshold - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.move_throttle_ms, 16);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"snap": {"grid_enabled": true, "grid_spacing": "Coarse"}}"#;
        let config = EditorConfig::from_json(json).unwrap();
        assert!(config.snap.grid_enabled);
        assert_eq!(config.snap.grid_spacing, GridSpacing::Coarse);
        assert!((config.snap.threshold - 10.0).abs() < f64::EPSILON);
        assert!((config.nudge_step_large - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = EditorConfig::default();
        config.duplicate_offset = 8.0;
        let back = EditorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let result = EditorConfig::from_json(r#"{"drag_threshold": 0.0}"#);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(EditorConfig::from_json("{"), Err(EngineError::Serialization(_))));
    }
}
