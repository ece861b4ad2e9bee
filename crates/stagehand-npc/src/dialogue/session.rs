//! Ephemeral navigation state for one running conversation

use super::{DialogueError, DialogueScript, Typewriter};

/// What a single advance produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStep {
    /// The typewriter was still running; the text is now fully revealed and
    /// no navigation happened.
    RevealCompleted,
    /// Fixed-screen fragment: the default advance does not apply.
    Held,
    /// Moved to a new fragment. `action` is the host action owed for leaving
    /// the previous fragment (on-advance hook or chosen button's action).
    Moved { index: usize, action: Option<String> },
    /// The conversation is over: the resolved target was past the end of the
    /// script, or the fragment reached (`last`) closes the dialogue.
    Ended {
        last: Option<usize>,
        action: Option<String>,
    },
}

/// Navigation state of one conversation: the current fragment and its
/// typewriter progress. Created when a conversation starts and dropped when
/// it ends; the script itself stays with the NPC.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    current: usize,
    typewriter: Typewriter,
}

impl DialogueSession {
    /// Start at `index`, which the caller has already resolved against the
    /// script. `default_rate` applies to fragments without their own speed.
    pub fn start(script: &DialogueScript, index: usize, default_rate: f32) -> Self {
        let mut session = Self {
            current: index,
            typewriter: Typewriter::new("", default_rate),
        };
        session.enter(script, index, default_rate);
        session
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn typewriter_mut(&mut self) -> &mut Typewriter {
        &mut self.typewriter
    }

    /// Whether the current fragment's buttons should be offered: questions
    /// only, and only once the text is fully revealed.
    pub fn buttons_ready(&self, script: &DialogueScript) -> bool {
        script
            .fragment(self.current)
            .is_some_and(|fragment| fragment.is_question && self.typewriter.is_complete())
    }

    /// Advance the conversation. A running typewriter is completed first;
    /// question fragments require an in-range `choice`. Rejected choices
    /// leave the session exactly where it was.
    pub fn advance(
        &mut self,
        script: &DialogueScript,
        choice: Option<usize>,
        default_rate: f32,
    ) -> Result<SessionStep, DialogueError> {
        if !self.typewriter.is_complete() {
            self.typewriter.skip();
            return Ok(SessionStep::RevealCompleted);
        }

        let fragment = script
            .fragment(self.current)
            .ok_or(DialogueError::UnknownTarget(self.current.into()))?;

        if fragment.is_question {
            let chosen = choice.ok_or(DialogueError::ChoiceRequired)?;
            let button = fragment
                .buttons
                .get(chosen)
                .ok_or(DialogueError::InvalidChoice {
                    chosen,
                    available: fragment.buttons.len(),
                })?;
            let action = button.action.clone();
            let next = script.resolve(&button.target)?;
            return Ok(self.land(script, next, action, default_rate));
        }

        if fragment.is_fixed_screen {
            return Ok(SessionStep::Held);
        }

        let action = fragment.on_advance.clone();
        if fragment.is_end_of_dialogue {
            return Ok(SessionStep::Ended {
                last: Some(self.current),
                action,
            });
        }

        let next = self.current + 1;
        if next >= script.len() {
            return Ok(SessionStep::Ended { last: None, action });
        }
        Ok(self.land(script, next, action, default_rate))
    }

    /// Move onto a resolved fragment, ending the conversation if it carries
    /// the end flag.
    fn land(
        &mut self,
        script: &DialogueScript,
        index: usize,
        action: Option<String>,
        default_rate: f32,
    ) -> SessionStep {
        let ends = script
            .fragment(index)
            .is_some_and(|fragment| fragment.is_end_of_dialogue);
        if ends {
            return SessionStep::Ended {
                last: Some(index),
                action,
            };
        }
        self.enter(script, index, default_rate);
        SessionStep::Moved { index, action }
    }

    fn enter(&mut self, script: &DialogueScript, index: usize, default_rate: f32) {
        self.current = index;
        let (text, rate) = script
            .fragment(index)
            .map(|fragment| {
                (
                    fragment.text.clone(),
                    fragment.type_speed.unwrap_or(default_rate),
                )
            })
            .unwrap_or_default();
        self.typewriter = Typewriter::new(text, rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{Button, Fragment, TYPE_SPEED_INSTANT};

    fn branching_script() -> DialogueScript {
        DialogueScript::new(vec![
            Fragment::question(
                "Hi",
                vec![Button::new("A", 1usize), Button::new("B", "end")],
            ),
            Fragment::new("...").ending(),
            Fragment::named("end", "Bye").ending(),
        ])
        .unwrap()
    }

    fn instant(mut fragment: Fragment) -> Fragment {
        fragment.type_speed = Some(TYPE_SPEED_INSTANT);
        fragment
    }

    #[test]
    fn test_first_advance_skips_typing() {
        let script = DialogueScript::new(vec![Fragment::new("slow text"), Fragment::new("next")])
            .unwrap();
        let mut session = DialogueSession::start(&script, 0, 5.0);
        assert!(!session.typewriter().is_complete());

        let step = session.advance(&script, None, 5.0).unwrap();
        assert_eq!(step, SessionStep::RevealCompleted);
        assert_eq!(session.current_index(), 0);
        assert!(session.typewriter().is_complete());

        let step = session.advance(&script, None, 5.0).unwrap();
        assert_eq!(
            step,
            SessionStep::Moved {
                index: 1,
                action: None
            }
        );
    }

    #[test]
    fn test_question_requires_choice() {
        let script = branching_script();
        let mut session = DialogueSession::start(&script, 0, TYPE_SPEED_INSTANT);

        let err = session.advance(&script, None, TYPE_SPEED_INSTANT).unwrap_err();
        assert_eq!(err, DialogueError::ChoiceRequired);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_out_of_range_choice_leaves_session_unchanged() {
        let script = branching_script();
        let mut session = DialogueSession::start(&script, 0, TYPE_SPEED_INSTANT);

        let err = session
            .advance(&script, Some(7), TYPE_SPEED_INSTANT)
            .unwrap_err();
        assert_eq!(
            err,
            DialogueError::InvalidChoice {
                chosen: 7,
                available: 2
            }
        );
        assert_eq!(session.current_index(), 0);
        assert!(session.buttons_ready(&script));
    }

    #[test]
    fn test_choosing_named_end_branch_ends_session() {
        let script = branching_script();
        let mut session = DialogueSession::start(&script, 0, TYPE_SPEED_INSTANT);

        let step = session.advance(&script, Some(1), TYPE_SPEED_INSTANT).unwrap();
        assert_eq!(
            step,
            SessionStep::Ended {
                last: Some(2),
                action: None
            }
        );
    }

    #[test]
    fn test_advancing_into_end_fragment_ends_session() {
        let script = DialogueScript::new(vec![
            instant(Fragment::new("first")),
            Fragment::new("done").ending(),
        ])
        .unwrap();
        let mut session = DialogueSession::start(&script, 0, 30.0);

        let step = session.advance(&script, None, 30.0).unwrap();
        assert_eq!(
            step,
            SessionStep::Ended {
                last: Some(1),
                action: None
            }
        );
    }

    #[test]
    fn test_advancing_past_last_fragment_ends_session() {
        let script = DialogueScript::new(vec![instant(Fragment::new("only"))]).unwrap();
        let mut session = DialogueSession::start(&script, 0, 30.0);

        let step = session.advance(&script, None, 30.0).unwrap();
        assert_eq!(
            step,
            SessionStep::Ended {
                last: None,
                action: None
            }
        );
    }

    #[test]
    fn test_fixed_screen_holds() {
        let mut fragment = instant(Fragment::new("stay"));
        fragment.is_fixed_screen = true;
        let script = DialogueScript::new(vec![fragment, Fragment::new("unreachable")]).unwrap();
        let mut session = DialogueSession::start(&script, 0, 30.0);

        assert_eq!(
            session.advance(&script, None, 30.0).unwrap(),
            SessionStep::Held
        );
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_actions_surface_on_navigation() {
        let mut first = instant(Fragment::new("first"));
        first.on_advance = Some("open_shop".to_string());
        let mut chosen = Button::new("Deal", 2usize);
        chosen.action = Some("take_gold".to_string());
        let question = instant(Fragment::question("Buy?", vec![chosen]));
        let script = DialogueScript::new(vec![
            first,
            question,
            instant(Fragment::new("Enjoy")),
        ])
        .unwrap();

        let mut session = DialogueSession::start(&script, 0, 30.0);
        let step = session.advance(&script, None, 30.0).unwrap();
        assert_eq!(
            step,
            SessionStep::Moved {
                index: 1,
                action: Some("open_shop".to_string())
            }
        );

        let step = session.advance(&script, Some(0), 30.0).unwrap();
        assert_eq!(
            step,
            SessionStep::Moved {
                index: 2,
                action: Some("take_gold".to_string())
            }
        );
    }

    #[test]
    fn test_unknown_button_target_propagates() {
        let question = instant(Fragment::question(
            "Where?",
            vec![Button::new("Nowhere", "missing")],
        ));
        let script = DialogueScript::new(vec![question]).unwrap();
        let mut session = DialogueSession::start(&script, 0, 30.0);

        let err = session.advance(&script, Some(0), 30.0).unwrap_err();
        assert!(matches!(err, DialogueError::UnknownTarget(_)));
    }

    #[test]
    fn test_fragment_type_speed_overrides_default() {
        let script = DialogueScript::new(vec![instant(Fragment::new("fast"))]).unwrap();
        let session = DialogueSession::start(&script, 0, 1.0);
        assert!(session.typewriter().is_complete());
    }
}
