use thiserror::Error;

pub type TooltipResult<T> = std::result::Result<T, TooltipError>;

#[derive(Debug, Error)]
pub enum TooltipError {
    #[error("invalid tooltip transition: from {from:?} using event {event:?}")]
    InvalidStateTransition {
        from: TooltipPhase,
        event: TooltipEvent,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipPhase {
    #[default]
    Hidden,
    Previewing,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipEvent {
    Edit,
    Show,
    Save,
    Cancel,
    Hide,
}

#[derive(Debug, Default)]
pub struct TooltipMachine {
    phase: TooltipPhase,
}

impl TooltipMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TooltipPhase {
        self.phase
    }

    pub fn can_transition(&self, event: TooltipEvent) -> bool {
        self.next_phase(event).is_some()
    }

    pub fn next_phase(&self, event: TooltipEvent) -> Option<TooltipPhase> {
        use TooltipEvent::*;
        match (self.phase, event) {
            (_, Edit) => Some(TooltipPhase::Editing),
            (_, Show) => Some(TooltipPhase::Previewing),
            (_, Hide) => Some(TooltipPhase::Hidden),
            (TooltipPhase::Hidden, Save | Cancel) => None,
            (TooltipPhase::Previewing | TooltipPhase::Editing, Save | Cancel) => {
                Some(TooltipPhase::Hidden)
            }
        }
    }

    pub fn transition(&mut self, event: TooltipEvent) -> TooltipResult<TooltipPhase> {
        tracing::debug!(from = ?self.phase, event = ?event, "request tooltip transition");
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase;
            tracing::warn!(from = ?from, event = ?event, "invalid tooltip transition requested");
            TooltipError::InvalidStateTransition { from, event }
        })?;
        self.phase = next;
        Ok(self.phase)
    }
}

impl std::fmt::Display for TooltipMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TooltipPhase::{:?}", self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = TooltipMachine::new();
        assert!(machine.can_transition(TooltipEvent::Edit));
        assert!(machine.can_transition(TooltipEvent::Hide));
        assert!(!machine.can_transition(TooltipEvent::Save));
        assert!(!machine.can_transition(TooltipEvent::Cancel));

        machine
            .transition(TooltipEvent::Edit)
            .expect("hidden -> editing should transition");

        assert!(machine.can_transition(TooltipEvent::Save));
        assert!(machine.can_transition(TooltipEvent::Cancel));
        assert!(machine.can_transition(TooltipEvent::Edit));
    }

    #[test]
    fn preview_then_edit_then_save_returns_to_hidden() {
        let mut machine = TooltipMachine::new();
        for (event, expected) in [
            (TooltipEvent::Show, TooltipPhase::Previewing),
            (TooltipEvent::Edit, TooltipPhase::Editing),
            (TooltipEvent::Edit, TooltipPhase::Editing),
            (TooltipEvent::Save, TooltipPhase::Hidden),
        ] {
            let phase = machine
                .transition(event)
                .expect("transition in sequence should work");
            assert_eq!(phase, expected);
        }
    }

    #[test]
    fn save_while_hidden_returns_error_without_changing_phase() {
        let mut machine = TooltipMachine::new();

        let err = machine
            .transition(TooltipEvent::Save)
            .expect_err("hidden -> save should fail");
        assert!(matches!(
            err,
            TooltipError::InvalidStateTransition {
                from: TooltipPhase::Hidden,
                event: TooltipEvent::Save
            }
        ));
        assert_eq!(machine.phase(), TooltipPhase::Hidden);
    }
}
