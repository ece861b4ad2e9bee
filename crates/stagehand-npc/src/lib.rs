//! Stagehand NPC - NPC interaction engine
//!
//! Drives an in-world character through a small set of behavioral modes:
//! standing idle, holding a branching conversation with a typewriter text
//! reveal and player-chosen branches, or walking a scripted path with
//! optional smooth-curve resampling.
//!
//! The engine is renderer-, audio-, and UI-agnostic. A host scene feeds it
//! clicks and frame ticks through [`InteractionController`] and receives
//! everything it should present back through the [`NpcHost`] trait.

pub mod dialogue;
pub mod host;
pub mod interaction;
pub mod npc;
pub mod path;

pub use dialogue::{
    Button, DialogueError, DialogueScript, DialogueSession, DialogueTarget, Fragment, SessionStep,
    Typewriter, DEFAULT_TYPE_SPEED, TYPE_SPEED_INSTANT,
};
pub use host::{NpcHost, NullHost};
pub use interaction::InteractionController;
pub use npc::{ActivationOutcome, NpcConfig, NpcEvent, NpcId, NpcMode, NpcRuntime, TriggerSource};
pub use path::{PathError, PathEvent, PathPlan, PathRequest, PathWalker};
