//! Top-level controller binding scene triggers to the NPC state machine
//!
//! Owns one [`NpcRuntime`] and translates host traffic (clicks, frame ticks,
//! explicit API calls) into transitions. Crossed events are dispatched to
//! the [`NpcHost`] only after the machine has settled, and presentation
//! (dialogue text, buttons, hover prompt, animation clips, transform) is
//! synced afterwards.

use glam::Vec3;

use crate::dialogue::DialogueError;
use crate::host::NpcHost;
use crate::npc::{ActivationOutcome, NpcEvent, NpcMode, NpcRuntime, TriggerSource};
use crate::path::{PathError, PathRequest};

/// Public entry point for one NPC: activation, deactivation, path commands,
/// and the per-frame tick.
#[derive(Debug)]
pub struct InteractionController {
    npc: NpcRuntime,
    last_mode: Option<NpcMode>,
    dialog_visible: bool,
    buttons_visible: bool,
    hover_visible: bool,
}

impl InteractionController {
    pub fn new(npc: NpcRuntime) -> Self {
        Self {
            npc,
            last_mode: None,
            dialog_visible: false,
            buttons_visible: false,
            hover_visible: false,
        }
    }

    pub fn npc(&self) -> &NpcRuntime {
        &self.npc
    }

    pub fn npc_mut(&mut self) -> &mut NpcRuntime {
        &mut self.npc
    }

    /// Try to start a conversation from the given trigger source.
    pub fn activate(&mut self, trigger: TriggerSource, host: &mut dyn NpcHost) -> ActivationOutcome {
        let outcome = self.npc.activate(trigger);
        self.flush(host);
        outcome
    }

    /// Force-end whatever is running and return to standing.
    pub fn deactivate(&mut self, host: &mut dyn NpcHost) {
        self.npc.deactivate();
        self.flush(host);
    }

    /// Advance the running conversation; questions need a button choice.
    pub fn advance_dialogue(
        &mut self,
        choice: Option<usize>,
        host: &mut dyn NpcHost,
    ) -> Result<(), DialogueError> {
        let result = self.npc.advance_dialogue(choice);
        self.flush(host);
        result
    }

    /// Start (or replace) scripted path motion.
    pub fn follow_path(
        &mut self,
        request: &PathRequest,
        host: &mut dyn NpcHost,
    ) -> Result<(), PathError> {
        let result = self.npc.follow_path(request);
        self.flush(host);
        result
    }

    /// One frame from the scene loop: proximity and cooldown first, then
    /// mode advancement, then callbacks and presentation.
    pub fn on_tick(&mut self, delta: f32, player_position: Vec3, host: &mut dyn NpcHost) {
        self.npc.tick(delta, player_position);
        self.flush(host);
    }

    /// Dispatch buffered events, then reconcile presentation with the
    /// machine's settled state.
    fn flush(&mut self, host: &mut dyn NpcHost) {
        for event in self.npc.drain_events() {
            match event {
                NpcEvent::ConversationStarted { fragment } => {
                    self.buttons_visible = false;
                    host.on_conversation_started(fragment);
                }
                NpcEvent::FragmentShown { .. } => {
                    self.buttons_visible = false;
                }
                NpcEvent::ConversationEnded => host.on_conversation_ended(),
                NpcEvent::PlayerEnteredRange => host.on_player_entered_range(),
                NpcEvent::PlayerWalkedAway => host.on_player_walked_away(),
                NpcEvent::ActionTriggered(name) => host.run_action(&name),
                NpcEvent::SoundCue(path) => host.play_sound(&path),
                NpcEvent::PathStarted => {}
                NpcEvent::WaypointReached(waypoint) => host.on_waypoint_reached(waypoint),
                NpcEvent::LoopCompleted => host.on_loop_completed(),
                NpcEvent::PathFinished => host.on_path_finished(),
            }
        }
        self.sync_presentation(host);
    }

    fn sync_presentation(&mut self, host: &mut dyn NpcHost) {
        let mode = self.npc.mode();

        // Animation clips follow mode changes.
        if self.last_mode != Some(mode) {
            let clip = match mode {
                NpcMode::FollowingPath => self.npc.config().walking_animation.clone(),
                NpcMode::Standing | NpcMode::Talking => self.npc.config().idle_animation.clone(),
            };
            host.play_animation(&clip, true);
            self.last_mode = Some(mode);
        }

        // Dialogue UI.
        if mode == NpcMode::Talking {
            if let (Some(fragment), Some(session)) =
                (self.npc.current_fragment(), self.npc.session())
            {
                host.render_dialog(fragment, session.typewriter().revealed());
                self.dialog_visible = true;

                let buttons_ready = session.buttons_ready(self.npc.script());
                if buttons_ready && !self.buttons_visible {
                    host.render_buttons(&fragment.buttons);
                    self.buttons_visible = true;
                }
            }
        } else if self.dialog_visible {
            host.hide_dialog();
            self.dialog_visible = false;
            self.buttons_visible = false;
        }

        // Hover prompt while standing in react range.
        let hover = mode == NpcMode::Standing && self.npc.player_in_range();
        if hover != self.hover_visible {
            if hover {
                host.show_hover_text(&self.npc.config().hover_text);
            } else {
                host.hide_hover_text();
            }
            self.hover_visible = hover;
        }

        // Scene transform.
        host.set_npc_position(self.npc.position());
        host.set_npc_facing(self.npc.facing_direction());
    }
}
