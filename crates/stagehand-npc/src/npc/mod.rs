//! NPC runtime — modes, configuration, and the interaction state machine

mod config;
mod runtime;

pub use config::NpcConfig;
pub use runtime::{ActivationOutcome, NpcEvent, NpcRuntime, TriggerSource};

/// Unique identifier for an NPC instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NpcId(pub u64);

/// Behavioral mode of an NPC.
///
/// `Talking` and `FollowingPath` are mutually exclusive; entering one while
/// the other is live cleanly exits the other first. `Standing` is the
/// initial and fallback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcMode {
    Standing,
    Talking,
    FollowingPath,
}

impl NpcMode {
    pub fn name(&self) -> &'static str {
        match self {
            NpcMode::Standing => "standing",
            NpcMode::Talking => "talking",
            NpcMode::FollowingPath => "following path",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npc_id_equality() {
        assert_eq!(NpcId(7), NpcId(7));
        assert_ne!(NpcId(7), NpcId(8));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(NpcMode::Standing.name(), "standing");
        assert_eq!(NpcMode::FollowingPath.name(), "following path");
    }
}
