//! Dialogue system — branching scripts, navigation targets, and sessions
//!
//! A [`DialogueScript`] is an ordered, name-addressable list of [`Fragment`]s.
//! The script is immutable once built; navigation state lives in
//! [`DialogueSession`], and the timed text reveal in [`Typewriter`].

mod session;
mod typewriter;

pub use session::{DialogueSession, SessionStep};
pub use typewriter::{Typewriter, DEFAULT_TYPE_SPEED, TYPE_SPEED_INSTANT};

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors from building or navigating a dialogue script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogueError {
    #[error("dialogue script has no fragments")]
    EmptyScript,

    #[error("duplicate fragment name '{0}'")]
    DuplicateName(String),

    #[error("question fragment {0} has no buttons")]
    QuestionWithoutButtons(usize),

    #[error("no fragment matches target {0}")]
    UnknownTarget(DialogueTarget),

    #[error("button choice {chosen} out of range ({available} buttons)")]
    InvalidChoice { chosen: usize, available: usize },

    #[error("current fragment is a question and needs a button choice")]
    ChoiceRequired,
}

/// Where a jump points: a fragment index or a fragment name resolved against
/// the script. Authored data writes either `3` or `"farewell"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DialogueTarget {
    Index(usize),
    Name(String),
}

impl fmt::Display for DialogueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueTarget::Index(index) => write!(f, "#{index}"),
            DialogueTarget::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl From<usize> for DialogueTarget {
    fn from(index: usize) -> Self {
        DialogueTarget::Index(index)
    }
}

impl From<&str> for DialogueTarget {
    fn from(name: &str) -> Self {
        DialogueTarget::Name(name.to_string())
    }
}

/// A player-choice button attached to a question fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    /// Fragment shown when this button is chosen.
    pub target: DialogueTarget,
    /// Host action dispatched when this button is chosen.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub offset_x: Option<f32>,
    #[serde(default)]
    pub offset_y: Option<f32>,
}

impl Button {
    pub fn new(label: impl Into<String>, target: impl Into<DialogueTarget>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            action: None,
            font_size: None,
            offset_x: None,
            offset_y: None,
        }
    }
}

/// One unit of dialogue text plus its display and navigation metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    /// Unique jump label for name targets.
    #[serde(default)]
    pub name: Option<String>,
    /// Characters revealed per second; [`TYPE_SPEED_INSTANT`] shows the whole
    /// text at once. Unset falls back to the NPC's configured speed.
    #[serde(default)]
    pub type_speed: Option<f32>,
    /// A question presents its buttons and waits for a choice.
    #[serde(default)]
    pub is_question: bool,
    /// Suppresses the default "advance to the next fragment" navigation.
    #[serde(default)]
    pub is_fixed_screen: bool,
    /// Reaching this fragment closes the conversation.
    #[serde(default)]
    pub is_end_of_dialogue: bool,
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub portrait: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Sound cue played when the fragment is shown.
    #[serde(default)]
    pub audio: Option<String>,
    /// Host action dispatched when the session advances past this fragment.
    #[serde(default)]
    pub on_advance: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub offset_x: Option<f32>,
    #[serde(default)]
    pub offset_y: Option<f32>,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A named fragment, addressable as a jump target.
    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(text)
        }
    }

    /// A question fragment with its choice buttons.
    pub fn question(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self {
            is_question: true,
            buttons,
            ..Self::new(text)
        }
    }

    /// Mark this fragment as closing the conversation.
    pub fn ending(mut self) -> Self {
        self.is_end_of_dialogue = true;
        self
    }
}

/// An immutable, name-addressable collection of dialogue fragments.
///
/// The name lookup is built once here; duplicate names surface as a
/// construction error rather than being silently resolved first-wins.
#[derive(Debug, Clone)]
pub struct DialogueScript {
    fragments: Vec<Fragment>,
    names: HashMap<String, usize>,
}

impl DialogueScript {
    pub fn new(fragments: Vec<Fragment>) -> Result<Self, DialogueError> {
        if fragments.is_empty() {
            return Err(DialogueError::EmptyScript);
        }

        let mut names = HashMap::new();
        for (index, fragment) in fragments.iter().enumerate() {
            if fragment.is_question && fragment.buttons.is_empty() {
                return Err(DialogueError::QuestionWithoutButtons(index));
            }
            if let Some(name) = &fragment.name {
                if names.insert(name.clone(), index).is_some() {
                    return Err(DialogueError::DuplicateName(name.clone()));
                }
            }
        }

        Ok(Self { fragments, names })
    }

    /// Resolve an index-or-name target to a fragment index.
    pub fn resolve(&self, target: &DialogueTarget) -> Result<usize, DialogueError> {
        match target {
            DialogueTarget::Index(index) if *index < self.fragments.len() => Ok(*index),
            DialogueTarget::Name(name) => self
                .names
                .get(name)
                .copied()
                .ok_or_else(|| DialogueError::UnknownTarget(target.clone())),
            DialogueTarget::Index(_) => Err(DialogueError::UnknownTarget(target.clone())),
        }
    }

    pub fn fragment(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
