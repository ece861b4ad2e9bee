//! The collaborator boundary — everything the engine asks of its scene
//!
//! The engine is renderer-, audio-, and UI-agnostic. Each frame the
//! [`InteractionController`](crate::InteractionController) reports what
//! should be presented through this trait. Every method defaults to a no-op
//! so a host implements only what it observes.

use glam::Vec3;

use crate::dialogue::{Button, Fragment};

/// Capabilities the engine calls into, plus the notifications it emits.
///
/// Notifications are dispatched only after the state machine has settled, so
/// an implementation always observes a consistent engine; follow-up requests
/// a notification wants to make are applied through the public API on the
/// next frame.
#[allow(unused_variables)]
pub trait NpcHost {
    /// Play an animation clip by name.
    fn play_animation(&mut self, name: &str, looped: bool) {}

    /// Play a sound cue.
    fn play_sound(&mut self, path: &str) {}

    /// Show a dialogue fragment at the current reveal state. Called every
    /// frame while a conversation runs.
    fn render_dialog(&mut self, fragment: &Fragment, revealed: &str) {}

    /// Show a question's choice buttons. Called once per question, when its
    /// text finishes revealing.
    fn render_buttons(&mut self, buttons: &[Button]) {}

    /// Remove the dialogue UI.
    fn hide_dialog(&mut self) {}

    /// Show the in-range interaction prompt.
    fn show_hover_text(&mut self, text: &str) {}

    /// Remove the interaction prompt.
    fn hide_hover_text(&mut self) {}

    /// Move the NPC's scene transform.
    fn set_npc_position(&mut self, position: Vec3) {}

    /// Turn the NPC's scene transform toward a ground-plane direction.
    fn set_npc_facing(&mut self, direction: Vec3) {}

    /// Run a named script action (button actions, on-advance hooks).
    fn run_action(&mut self, name: &str) {}

    /// A conversation started at the given fragment.
    fn on_conversation_started(&mut self, fragment: usize) {}

    /// A conversation ended, for any reason.
    fn on_conversation_ended(&mut self) {}

    /// An original waypoint of the active path was passed.
    fn on_waypoint_reached(&mut self, waypoint: usize) {}

    /// The active looping path wrapped around.
    fn on_loop_completed(&mut self) {}

    /// The active finite path reached its end.
    fn on_path_finished(&mut self) {}

    /// The player crossed into react range.
    fn on_player_entered_range(&mut self) {}

    /// The player crossed out of react range.
    fn on_player_walked_away(&mut self) {}
}

/// A host that ignores everything. Handy for headless updates and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl NpcHost for NullHost {}
