//! The post-checkpoint branch.

use crate::task::TaskState;

/// What happens after the human checkpoint step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointDecision {
    /// Compose the final output and complete the task.
    Finalize,
    /// Terminate the traversal in the suspended state, pending feedback.
    Suspend,
}

impl CheckpointDecision {
    /// Evaluates the branch, once per graph invocation.
    ///
    /// Single-pass policy: the traversal suspends only when the task awaits
    /// input and no feedback has been attached yet. Any attached feedback
    /// finalizes — including rejected feedback. A rejection therefore does
    /// not loop back to another checkpoint; the service layer annotates the
    /// description and the re-run finalizes in one pass.
    pub fn evaluate(state: &TaskState) -> Self {
        match &state.human_feedback {
            Some(_) => CheckpointDecision::Finalize,
            None if state.requires_human_input => CheckpointDecision::Suspend,
            None => CheckpointDecision::Finalize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::HumanFeedback;
    use chrono::Utc;

    fn feedback(approved: bool) -> HumanFeedback {
        HumanFeedback {
            approved,
            feedback: "looks fine".to_string(),
            modifications: serde_json::Map::new(),
            timestamp: Utc::now(),
        }
    }

    fn suspended_state() -> TaskState {
        let mut state = TaskState::new("decide");
        state.requires_human_input = true;
        state
    }

    #[test]
    fn test_no_feedback_suspends() {
        let state = suspended_state();
        assert_eq!(
            CheckpointDecision::evaluate(&state),
            CheckpointDecision::Suspend
        );
    }

    #[test]
    fn test_approved_feedback_finalizes() {
        let mut state = suspended_state();
        state.human_feedback = Some(feedback(true));
        assert_eq!(
            CheckpointDecision::evaluate(&state),
            CheckpointDecision::Finalize
        );
    }

    #[test]
    fn test_rejected_feedback_also_finalizes() {
        // Deliberate single-pass policy: rejection does not re-suspend.
        let mut state = suspended_state();
        state.human_feedback = Some(feedback(false));
        assert_eq!(
            CheckpointDecision::evaluate(&state),
            CheckpointDecision::Finalize
        );
    }

    #[test]
    fn test_fresh_state_without_checkpoint_finalizes() {
        let state = TaskState::new("never suspended");
        assert_eq!(
            CheckpointDecision::evaluate(&state),
            CheckpointDecision::Finalize
        );
    }
}
