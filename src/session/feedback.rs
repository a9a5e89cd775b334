use crate::api::FeedbackType;

use super::message::MessageId;

/// Session-level feedback workflow.
///
/// `Idle -> AwaitingSelection -> TypeSelected -> Idle`, restarting for every
/// low-confidence reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackState {
    Idle,
    AwaitingSelection,
    TypeSelected(FeedbackType),
}

/// The open feedback prompt. At most one exists per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFeedback {
    session_id: String,
    feedback_type: Option<FeedbackType>,
    correlated_message_id: Option<MessageId>,
    ticket: u64,
    in_flight: bool,
}

impl PendingFeedback {
    pub(super) const fn new(
        session_id: String,
        correlated_message_id: Option<MessageId>,
        ticket: u64,
    ) -> Self {
        Self {
            session_id,
            feedback_type: None,
            correlated_message_id,
            ticket,
            in_flight: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub const fn feedback_type(&self) -> Option<FeedbackType> {
        self.feedback_type
    }

    /// The reply whose low confidence opened this prompt, if any.
    pub const fn correlated_message_id(&self) -> Option<&MessageId> {
        self.correlated_message_id.as_ref()
    }

    pub const fn state(&self) -> FeedbackState {
        match self.feedback_type {
            None => FeedbackState::AwaitingSelection,
            Some(feedback_type) => FeedbackState::TypeSelected(feedback_type),
        }
    }

    pub(super) const fn ticket(&self) -> u64 {
        self.ticket
    }

    pub(super) const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub(super) const fn select(&mut self, feedback_type: FeedbackType) {
        self.feedback_type = Some(feedback_type);
    }

    pub(super) const fn mark_in_flight(&mut self) {
        self.in_flight = true;
    }
}
