use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{ForcepsError, ForcepsResult};

/// How a tool decides which object to pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Pick the candidate closest to the grip anchor, once, on the edge that closes the tool.
    OnConfirm,
    /// Every frame while closing and empty handed, pick an object that sits between both jaw tips.
    Pinch,
}

/// How the activate control maps onto the tool's intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Pressing closes the tool, releasing opens it.
    PressToClose,
    /// Pressing opens the tool (and drops whatever it holds), releasing closes it again.
    ReleaseToClose,
}

/// Where a held object gets pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GripAnchor {
    /// The rig's grip anchor part.
    Part,
    /// Half way between the two jaw tips.
    JawTips,
}

/// Tunables for a single tool.
///
/// Angles are in degrees, distances in metres, speeds in openness units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// How objects are selected
    pub selection_policy: SelectionPolicy,
    /// How the activate control is interpreted. `None` leaves the tool without an input binding.
    pub trigger_mode: Option<TriggerMode>,
    /// Where held objects are pinned
    pub grip_anchor: GripAnchor,
    /// How far the stem slides forward when fully open
    pub stem_travel: f32,
    /// How far the pusher slides, as a fraction of the stem's travel
    pub pusher_travel_ratio: f32,
    /// Jaw angle at openness 0
    pub jaw_closed_angle: f32,
    /// Jaw angle at openness 1
    pub jaw_open_angle: f32,
    /// Maximum change in openness per second
    pub animation_speed: f32,
    /// Openness held while gripping an object
    pub holding_open_amount: f32,
    /// Openness when the tool is added to the scene
    pub initial_openness: f32,
    /// Candidates further than this from the grip anchor are never picked
    pub grip_distance: f32,
    /// Radius of the contact sensor that feeds the candidate registry
    pub contact_radius: f32,
    /// Radius of the overlap query used by [`SelectionPolicy::Pinch`]
    pub detection_radius: f32,
    /// Maximum distance from each jaw tip for a pinch to succeed
    pub tip_grip_distance: f32,
    /// Position of a jaw's tip in that jaw's local space
    pub jaw_tip_offset: Vec3,
}

impl Default for ToolSettings {
    fn default() -> Self {
        ToolSettings::forceps()
    }
}

impl ToolSettings {
    /// Forceps with a sliding stem and pusher. The jaws close when the control is released,
    /// and the closest touching object is picked up at that moment.
    pub fn forceps() -> Self {
        ToolSettings {
            selection_policy: SelectionPolicy::OnConfirm,
            trigger_mode: Some(TriggerMode::ReleaseToClose),
            grip_anchor: GripAnchor::Part,
            stem_travel: 0.02,
            pusher_travel_ratio: 0.8,
            jaw_closed_angle: 0.,
            jaw_open_angle: 15.,
            animation_speed: 5.,
            holding_open_amount: 0.4,
            initial_openness: 0.,
            grip_distance: 0.15,
            contact_radius: 0.03,
            detection_radius: 0.2,
            tip_grip_distance: 0.06,
            jaw_tip_offset: Vec3::ZERO,
        }
    }

    /// V-shaped tweezers. Holding the control pinches, and anything caught between both tips is
    /// picked up.
    pub fn tweezers() -> Self {
        ToolSettings {
            selection_policy: SelectionPolicy::Pinch,
            trigger_mode: Some(TriggerMode::PressToClose),
            grip_anchor: GripAnchor::JawTips,
            stem_travel: 0.,
            jaw_closed_angle: 2.,
            jaw_open_angle: 20.,
            animation_speed: 3.,
            jaw_tip_offset: Vec3::new(0., 0.12, 0.),
            ..ToolSettings::forceps()
        }
    }

    /// Parse settings from JSON. Missing fields take their [`ToolSettings::forceps`] value.
    pub fn from_json(json: &str) -> ForcepsResult<Self> {
        let settings: ToolSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file, see [`ToolSettings::from_json`].
    pub fn load(path: impl AsRef<Path>) -> ForcepsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read tool settings from {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> ForcepsResult<()> {
        if !(self.holding_open_amount > 0. && self.holding_open_amount < 1.) {
            return invalid(format!(
                "holding_open_amount must be between 0 and 1 (exclusive), got {}",
                self.holding_open_amount
            ));
        }
        if !(self.animation_speed > 0.) {
            return invalid(format!(
                "animation_speed must be positive, got {}",
                self.animation_speed
            ));
        }
        if !(0. ..=1.).contains(&self.initial_openness) {
            return invalid(format!(
                "initial_openness must be between 0 and 1, got {}",
                self.initial_openness
            ));
        }

        for (name, value) in [
            ("stem_travel", self.stem_travel),
            ("pusher_travel_ratio", self.pusher_travel_ratio),
            ("grip_distance", self.grip_distance),
            ("contact_radius", self.contact_radius),
            ("detection_radius", self.detection_radius),
            ("tip_grip_distance", self.tip_grip_distance),
        ] {
            if !(value >= 0.) {
                return invalid(format!("{name} must not be negative, got {value}"));
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> ForcepsResult<()> {
    Err(ForcepsError::InvalidSettings(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_forceps() {
        let settings = ToolSettings::default();
        assert_eq!(settings, ToolSettings::forceps());
        assert_eq!(settings.selection_policy, SelectionPolicy::OnConfirm);
        assert_eq!(settings.trigger_mode, Some(TriggerMode::ReleaseToClose));
        assert!(settings.validate().is_ok());
        assert!(ToolSettings::tweezers().validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let settings = ToolSettings::from_json(
            r#"{
                "selection_policy": "pinch",
                "trigger_mode": null,
                "holding_open_amount": 0.25,
                "jaw_tip_offset": [0.0, 0.1, 0.0]
            }"#,
        )
        .unwrap();

        assert_eq!(settings.selection_policy, SelectionPolicy::Pinch);
        assert_eq!(settings.trigger_mode, None);
        assert_eq!(settings.holding_open_amount, 0.25);
        assert_eq!(settings.jaw_tip_offset, Vec3::new(0., 0.1, 0.));

        // Everything else comes from the forceps preset
        assert_eq!(settings.animation_speed, 5.);
        assert_eq!(settings.grip_anchor, GripAnchor::Part);
    }

    #[test]
    fn test_invalid_settings() {
        let err = ToolSettings::from_json(r#"{ "holding_open_amount": 1.0 }"#).unwrap_err();
        assert!(matches!(err, ForcepsError::InvalidSettings(_)));

        let err = ToolSettings::from_json(r#"{ "animation_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ForcepsError::InvalidSettings(_)));

        let err = ToolSettings::from_json(r#"{ "grip_distance": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ForcepsError::InvalidSettings(_)));

        let err = ToolSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ForcepsError::Json(_)));
    }

    #[test]
    fn test_load() {
        let path = std::env::temp_dir().join(format!("forceps-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "selection_policy": "pinch" }"#).unwrap();
        let settings = ToolSettings::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.unwrap().selection_policy, SelectionPolicy::Pinch);

        let err = ToolSettings::load(&path).unwrap_err();
        assert!(matches!(err, ForcepsError::Other(_)));
        assert!(err.to_string().contains("Unable to read tool settings"));
    }
}
