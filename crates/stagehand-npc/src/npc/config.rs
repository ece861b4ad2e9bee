//! NPC configuration — every field optional in authored data, normalized to
//! stated defaults when the NPC is registered

use serde::{Deserialize, Serialize};

use crate::dialogue::{DialogueTarget, DEFAULT_TYPE_SPEED};

/// Fully-populated NPC options.
///
/// Authored data may omit any field; deserialization fills in the defaults
/// below, so the rest of the engine never re-checks optionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Distance at which proximity tracking reacts, in meters.
    pub react_distance: f32,
    /// Seconds between a deactivation and the next allowed activation.
    pub cool_down_duration: f32,
    /// Prompt shown while the player is in react range.
    pub hover_text: String,
    /// Characters per second for dialogue text without its own rate.
    pub type_speed: f32,
    /// Meters per second for path requests without their own pacing.
    pub walking_speed: f32,
    /// Animation clip played while standing or talking.
    pub idle_animation: String,
    /// Animation clip played while walking a path.
    pub walking_animation: String,
    /// Turn toward the player while talking.
    pub face_user: bool,
    /// Radians per second for facing updates.
    pub turning_speed: f32,
    /// Activation allowed only through the external API.
    pub only_external_trigger: bool,
    /// Activation allowed only through clicks; no ambient proximity start.
    pub only_click_trigger: bool,
    /// Keep the dialogue open when the player walks out of range.
    pub continue_on_walk_away: bool,
    /// Portrait reference for the dialogue UI.
    pub portrait: Option<String>,
    /// Sound cue played when a conversation starts.
    pub dialogue_sound: Option<String>,
    /// Fragment a conversation opens at.
    pub start_fragment: DialogueTarget,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            react_distance: 6.0,
            cool_down_duration: 5.0,
            hover_text: "TALK".to_string(),
            type_speed: DEFAULT_TYPE_SPEED,
            walking_speed: 2.0,
            idle_animation: "Idle".to_string(),
            walking_animation: "Walk".to_string(),
            face_user: true,
            turning_speed: std::f32::consts::PI,
            only_external_trigger: false,
            only_click_trigger: false,
            continue_on_walk_away: false,
            portrait: None,
            dialogue_sound: None,
            start_fragment: DialogueTarget::Index(0),
        }
    }
}
