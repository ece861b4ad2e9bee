//! The per-NPC state machine driving dialogue and path-following modes
//!
//! All transitions happen synchronously inside the public calls or `tick`.
//! Each operation pushes the events it crossed into an internal buffer; the
//! caller drains the buffer only after the machine has settled, which is how
//! "callbacks fire last" is kept without any locking.

use glam::Vec3;
use tracing::{debug, warn};

use stagehand_core::{math, Cooldown};

use crate::dialogue::{
    DialogueError, DialogueScript, DialogueSession, Fragment, SessionStep,
};
use crate::path::{PathError, PathEvent, PathPlan, PathRequest, PathWalker};

use super::{NpcConfig, NpcId, NpcMode};

/// Where an activation attempt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// The player clicked the NPC.
    Click,
    /// The player crossed into react range.
    Proximity,
    /// Explicit call through the external API.
    Api,
}

/// Result of an activation attempt. Everything except `Started` is a
/// reported no-op, not an error: repeated player attempts are expected
/// traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Started,
    /// The cooldown since the last deactivation has not elapsed.
    OnCooldown,
    /// The trigger source is forbidden by the NPC's trigger flags.
    TriggerBlocked,
    /// A conversation is already running.
    AlreadyTalking,
}

impl ActivationOutcome {
    pub fn started(&self) -> bool {
        matches!(self, ActivationOutcome::Started)
    }
}

/// Events crossed during a state-machine operation, in the order they
/// happened. Dispatched to the host after the machine has settled.
#[derive(Debug, Clone, PartialEq)]
pub enum NpcEvent {
    ConversationStarted { fragment: usize },
    /// The session moved onto a new fragment.
    FragmentShown { fragment: usize },
    /// The conversation is over, for any reason.
    ConversationEnded,
    /// The player crossed into react range.
    PlayerEnteredRange,
    /// The player crossed out of react range. Fires whether or not the
    /// dialogue stays open.
    PlayerWalkedAway,
    /// A named host action should run (button action or on-advance hook).
    ActionTriggered(String),
    /// An audio cue should play.
    SoundCue(String),
    /// A new path plan took effect.
    PathStarted,
    /// An original waypoint of the active path was passed.
    WaypointReached(usize),
    /// The active looping path wrapped around.
    LoopCompleted,
    /// The active finite path reached its end.
    PathFinished,
}

/// The mutable root owning one NPC's mode and its mode-specific state.
///
/// At most one of the dialogue session / path walker exists at any instant;
/// the mode tells which. Created at NPC registration, dropped when the NPC
/// leaves the scene.
#[derive(Debug)]
pub struct NpcRuntime {
    id: NpcId,
    config: NpcConfig,
    script: DialogueScript,
    /// Resolved once from `config.start_fragment` at registration.
    start_index: usize,
    mode: NpcMode,
    position: Vec3,
    yaw: f32,
    cooldown: Cooldown,
    player_distance: f32,
    player_in_range: bool,
    session: Option<DialogueSession>,
    walker: Option<PathWalker>,
    events: Vec<NpcEvent>,
}

impl NpcRuntime {
    /// Register an NPC. The configured start fragment is resolved here so a
    /// bad target surfaces at registration, not mid-conversation.
    pub fn new(
        id: NpcId,
        config: NpcConfig,
        script: DialogueScript,
        position: Vec3,
    ) -> Result<Self, DialogueError> {
        let start_index = script.resolve(&config.start_fragment)?;
        Ok(Self {
            id,
            config,
            script,
            start_index,
            mode: NpcMode::Standing,
            position,
            yaw: 0.0,
            cooldown: Cooldown::new(),
            player_distance: f32::INFINITY,
            player_in_range: false,
            session: None,
            walker: None,
            events: Vec::new(),
        })
    }

    pub fn id(&self) -> NpcId {
        self.id
    }

    pub fn config(&self) -> &NpcConfig {
        &self.config
    }

    pub fn script(&self) -> &DialogueScript {
        &self.script
    }

    pub fn mode(&self) -> NpcMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Ground-plane direction the NPC currently faces.
    pub fn facing_direction(&self) -> Vec3 {
        math::direction_from_yaw(self.yaw)
    }

    pub fn player_in_range(&self) -> bool {
        self.player_in_range
    }

    /// Distance to the player as of the last tick.
    pub fn player_distance(&self) -> f32 {
        self.player_distance
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_active()
    }

    pub fn session(&self) -> Option<&DialogueSession> {
        self.session.as_ref()
    }

    /// The fragment the running conversation is showing, if any.
    pub fn current_fragment(&self) -> Option<&Fragment> {
        let session = self.session.as_ref()?;
        self.script.fragment(session.current_index())
    }

    /// Take the events crossed since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<NpcEvent> {
        std::mem::take(&mut self.events)
    }

    /// Try to start a conversation. No-op outcomes are reported, never
    /// raised: cooldown and trigger-flag rejections are expected traffic.
    pub fn activate(&mut self, trigger: TriggerSource) -> ActivationOutcome {
        if self.mode == NpcMode::Talking {
            return ActivationOutcome::AlreadyTalking;
        }
        if self.cooldown.is_active() {
            debug!(npc = self.id.0, "activation ignored: cooling down");
            return ActivationOutcome::OnCooldown;
        }
        if !self.trigger_allowed(trigger) {
            debug!(npc = self.id.0, ?trigger, "activation ignored: trigger blocked");
            return ActivationOutcome::TriggerBlocked;
        }

        if self.mode == NpcMode::FollowingPath {
            self.abandon_path();
        }

        self.mode = NpcMode::Talking;
        self.session = Some(DialogueSession::start(
            &self.script,
            self.start_index,
            self.config.type_speed,
        ));
        debug!(npc = self.id.0, ?trigger, fragment = self.start_index, "conversation started");

        self.events.push(NpcEvent::ConversationStarted {
            fragment: self.start_index,
        });
        if let Some(sound) = self.config.dialogue_sound.clone() {
            self.events.push(NpcEvent::SoundCue(sound));
        }
        self.push_fragment_audio(self.start_index);

        ActivationOutcome::Started
    }

    /// Force-end whatever is running and return to standing. Arms the
    /// cooldown.
    pub fn deactivate(&mut self) {
        match self.mode {
            NpcMode::Talking => self.end_conversation(),
            NpcMode::FollowingPath => self.abandon_path(),
            NpcMode::Standing => {}
        }
        self.cooldown.arm(self.config.cool_down_duration);
    }

    /// Advance the running conversation, choosing a button when the current
    /// fragment is a question. Outside a conversation this is a no-op.
    pub fn advance_dialogue(&mut self, choice: Option<usize>) -> Result<(), DialogueError> {
        if self.mode != NpcMode::Talking {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        match session.advance(&self.script, choice, self.config.type_speed) {
            Ok(SessionStep::RevealCompleted) | Ok(SessionStep::Held) => Ok(()),
            Ok(SessionStep::Moved { index, action }) => {
                if let Some(action) = action {
                    self.events.push(NpcEvent::ActionTriggered(action));
                }
                self.events.push(NpcEvent::FragmentShown { fragment: index });
                self.push_fragment_audio(index);
                Ok(())
            }
            Ok(SessionStep::Ended { action, .. }) => {
                if let Some(action) = action {
                    self.events.push(NpcEvent::ActionTriggered(action));
                }
                self.end_conversation();
                self.cooldown.arm(self.config.cool_down_duration);
                Ok(())
            }
            Err(
                error @ (DialogueError::ChoiceRequired | DialogueError::InvalidChoice { .. }),
            ) => {
                // Rejected input; the session is exactly where it was.
                warn!(npc = self.id.0, %error, "dialogue advance rejected");
                Err(error)
            }
            Err(error) => {
                // Navigation errors are fatal to the session.
                warn!(npc = self.id.0, %error, "dialogue navigation failed, ending conversation");
                self.end_conversation();
                self.cooldown.arm(self.config.cool_down_duration);
                Err(error)
            }
        }
    }

    /// Start (or atomically replace) scripted path motion. A rejected
    /// request leaves the NPC in its prior mode with nothing applied.
    pub fn follow_path(&mut self, request: &PathRequest) -> Result<(), PathError> {
        let plan = PathPlan::build(request, self.config.walking_speed)?;

        if self.mode == NpcMode::Talking {
            self.end_conversation();
        }

        let walker = PathWalker::new(plan);
        self.position = walker.position();
        self.walker = Some(walker);
        self.mode = NpcMode::FollowingPath;
        self.events.push(NpcEvent::PathStarted);
        debug!(npc = self.id.0, "path started");
        Ok(())
    }

    /// One frame: cooldown and proximity first, then mode-specific
    /// advancement, then facing. Crossed events accumulate for
    /// [`Self::drain_events`].
    pub fn tick(&mut self, delta: f32, player_position: Vec3) {
        self.cooldown.advance(delta);

        let distance = (player_position - self.position).length();
        let was_in_range = self.player_in_range;
        let in_range = distance <= self.config.react_distance;
        self.player_distance = distance;
        self.player_in_range = in_range;

        if was_in_range && !in_range {
            self.handle_walk_away();
        } else if !was_in_range && in_range {
            self.events.push(NpcEvent::PlayerEnteredRange);
            let ambient =
                !self.config.only_external_trigger && !self.config.only_click_trigger;
            if ambient {
                self.activate(TriggerSource::Proximity);
            }
        }

        match self.mode {
            NpcMode::Talking => {
                if let Some(session) = self.session.as_mut() {
                    session.typewriter_mut().advance(delta);
                }
            }
            NpcMode::FollowingPath => self.advance_path(delta),
            NpcMode::Standing => {}
        }

        self.update_facing(delta, player_position);
    }

    fn trigger_allowed(&self, trigger: TriggerSource) -> bool {
        match trigger {
            TriggerSource::Api => true,
            TriggerSource::Click => !self.config.only_external_trigger,
            TriggerSource::Proximity => {
                !self.config.only_external_trigger && !self.config.only_click_trigger
            }
        }
    }

    fn push_fragment_audio(&mut self, index: usize) {
        if let Some(audio) = self
            .script
            .fragment(index)
            .and_then(|fragment| fragment.audio.clone())
        {
            self.events.push(NpcEvent::SoundCue(audio));
        }
    }

    fn handle_walk_away(&mut self) {
        self.events.push(NpcEvent::PlayerWalkedAway);
        if self.mode == NpcMode::Talking && !self.config.continue_on_walk_away {
            self.end_conversation();
            self.cooldown.arm(self.config.cool_down_duration);
        }
    }

    /// Drop the session and return to standing.
    fn end_conversation(&mut self) {
        if self.session.take().is_some() {
            self.mode = NpcMode::Standing;
            self.events.push(NpcEvent::ConversationEnded);
            debug!(npc = self.id.0, "conversation ended");
        }
    }

    /// Drop the walker without a finish notification: a cancelled path never
    /// fires its terminal callback.
    fn abandon_path(&mut self) {
        if self.walker.take().is_some() {
            self.mode = NpcMode::Standing;
            debug!(npc = self.id.0, "path abandoned");
        }
    }

    fn advance_path(&mut self, delta: f32) {
        let Some(walker) = self.walker.as_mut() else {
            return;
        };
        let crossed = walker.advance(delta);
        self.position = walker.position();
        let finished = walker.is_finished();

        for event in crossed {
            self.events.push(match event {
                PathEvent::WaypointReached(waypoint) => NpcEvent::WaypointReached(waypoint),
                PathEvent::LoopCompleted => NpcEvent::LoopCompleted,
                PathEvent::Finished => NpcEvent::PathFinished,
            });
        }

        if finished {
            self.walker = None;
            self.mode = NpcMode::Standing;
            debug!(npc = self.id.0, "path finished");
        }
    }

    fn update_facing(&mut self, delta: f32, player_position: Vec3) {
        let target = match self.mode {
            NpcMode::Talking if self.config.face_user => {
                math::horizontal(player_position - self.position)
            }
            NpcMode::FollowingPath => self
                .walker
                .as_ref()
                .map(|walker| math::horizontal(walker.direction()))
                .unwrap_or(Vec3::ZERO),
            _ => Vec3::ZERO,
        };
        if target.length_squared() > 1e-6 {
            let target_yaw = math::yaw_from_direction(target);
            self.yaw = math::rotate_yaw_towards(
                self.yaw,
                target_yaw,
                self.config.turning_speed * delta.max(0.0),
            );
        }
    }
}
