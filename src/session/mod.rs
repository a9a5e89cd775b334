//! Conversation lifecycle and feedback correlation.
//!
//! [`ChatSession`] owns the transcript, the open/closed state, the language
//! and the feedback workflows. It never renders anything: front ends call its
//! operations and follow along through [`SessionEvent`]s.
//!
//! Concurrency rules:
//!
//! - One message send at a time. A send issued while another is in flight
//!   returns [`SendOutcome::Busy`] without touching the transcript or the
//!   network.
//! - Feedback submission is independent of sending and may overlap it.
//! - Nothing is cancelled or retried, and no client-side timeout applies.

mod feedback;
mod message;


use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::api::{ChatApi, ChatRequest, FeedbackRequest, FeedbackType};
use crate::i18n::{Language, Strings};
use crate::identity::SessionIdentity;

pub use feedback::{FeedbackState, PendingFeedback};
pub use message::{Message, MessageId, MessageMetadata, Sender};

use message::IdClock;

/// Replies below this confidence ask the user for feedback.
pub const DEFAULT_FEEDBACK_THRESHOLD: f64 = 0.7;

/// Pause before the feedback prompt so the reply can be read first.
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(1000);

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub language: Language,
    pub feedback_threshold: f64,
    pub feedback_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            feedback_threshold: DEFAULT_FEEDBACK_THRESHOLD,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }
}

/// State changes a front end may want to render.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MessageAppended(Message),
    SendingChanged(bool),
    LanguageChanged(Language),
    OpenChanged(bool),
    FeedbackRequested,
    FeedbackTypeSelected(FeedbackType),
    FeedbackClosed,
    InlineFeedbackSelected {
        message_id: MessageId,
        feedback_type: FeedbackType,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// Another send is still in flight; nothing happened.
    Busy,
    Replied {
        message: Message,
        feedback_scheduled: bool,
    },
    /// The request failed; `0` is the error message appended to the transcript.
    Failed(Message),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// No feedback type chosen, or a submit is already running.
    Ignored,
    Submitted,
    Failed,
}

#[derive(Debug, Default)]
struct State {
    language: Language,
    is_open: bool,
    unread: usize,
    sending: bool,
    transcript: Vec<Message>,
    pending: Option<PendingFeedback>,
    next_ticket: u64,
    inline: HashMap<MessageId, FeedbackType>,
    ids: IdClock,
}

struct Shared {
    api: Arc<dyn ChatApi>,
    identity: SessionIdentity,
    options: SessionOptions,
    state: Mutex<State>,
    events: broadcast::Sender<SessionEvent>,
}

/// A chat conversation with the remote chatbot.
///
/// Cloning yields another handle to the same conversation.
#[derive(Clone)]
pub struct ChatSession {
    shared: Arc<Shared>,
}

impl ChatSession {
    /// Starts a closed session with an empty transcript.
    pub fn new(api: Arc<dyn ChatApi>, identity: SessionIdentity, options: SessionOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = State {
            language: options.language,
            ..State::default()
        };

        tracing::debug!(
            session_id = identity.session_id(),
            user_id = identity.user_id(),
            "chat session initialized"
        );

        Self {
            shared: Arc::new(Shared {
                api,
                identity,
                options,
                state: Mutex::new(state),
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.shared.identity
    }

    pub fn options(&self) -> &SessionOptions {
        &self.shared.options
    }

    pub fn language(&self) -> Language {
        self.lock().language
    }

    /// Localized strings for the current language.
    pub fn strings(&self) -> &'static Strings {
        self.language().strings()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open
    }

    /// Messages appended while the session was closed.
    pub fn unread(&self) -> usize {
        self.lock().unread
    }

    pub fn is_sending(&self) -> bool {
        self.lock().sending
    }

    /// Snapshot of the transcript in display order.
    pub fn transcript(&self) -> Vec<Message> {
        self.lock().transcript.clone()
    }

    pub fn feedback_state(&self) -> FeedbackState {
        self.lock()
            .pending
            .as_ref()
            .map_or(FeedbackState::Idle, PendingFeedback::state)
    }

    pub fn pending_feedback(&self) -> Option<PendingFeedback> {
        self.lock().pending.clone()
    }

    /// The inline rating chosen for a message, if any.
    pub fn inline_feedback(&self, message_id: &MessageId) -> Option<FeedbackType> {
        self.lock().inline.get(message_id).copied()
    }

    /// Id of the most recent reply that can be rated inline.
    pub fn last_rateable_message_id(&self) -> Option<MessageId> {
        self.lock()
            .transcript
            .iter()
            .rev()
            .find(|m| m.is_rateable())
            .and_then(|m| m.message_id().cloned())
    }

    pub fn toggle_language(&self) -> Language {
        let language = {
            let mut state = self.lock();
            state.language = state.language.toggled();
            state.language
        };
        self.emit(SessionEvent::LanguageChanged(language));
        language
    }

    /// Opens the session and clears the unread count.
    pub fn open(&self) {
        {
            let mut state = self.lock();
            state.is_open = true;
            state.unread = 0;
        }
        self.emit(SessionEvent::OpenChanged(true));
    }

    /// Closes the session. Transcript and pending feedback are kept.
    pub fn close(&self) {
        self.lock().is_open = false;
        self.emit(SessionEvent::OpenChanged(false));
    }

    pub fn toggle_open(&self) -> bool {
        if self.is_open() {
            self.close();
            false
        } else {
            self.open();
            true
        }
    }

    /// Sends `text` to the chatbot and appends the reply.
    ///
    /// The user message is appended before the request goes out. Exactly one
    /// bot message follows: the reply, or a localized error on failure.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let request = {
            let mut state = self.lock();
            if state.sending {
                tracing::debug!("send ignored while another message is in flight");
                return SendOutcome::Busy;
            }
            state.sending = true;
            self.emit(SessionEvent::SendingChanged(true));
            self.append(&mut state, Message::user(text));

            ChatRequest {
                message: text.to_string(),
                language: state.language,
                session_id: self.shared.identity.session_id().to_string(),
                user_id: self.shared.identity.user_id().to_string(),
            }
        };
        let _sending = SendingGuard { session: self };

        let result = self.shared.api.chat(&request).await;

        let outcome = {
            let mut state = self.lock();
            match result {
                Ok(reply) => {
                    let message_id = state.ids.next();
                    let message = Message::bot_reply(
                        reply.response,
                        reply.confidence,
                        reply.category,
                        message_id,
                    );
                    self.append(&mut state, message.clone());
                    let feedback_scheduled =
                        reply.confidence < self.shared.options.feedback_threshold;
                    SendOutcome::Replied {
                        message,
                        feedback_scheduled,
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "chat request failed");
                    let message = Message::bot_error(state.language.strings().error);
                    self.append(&mut state, message.clone());
                    SendOutcome::Failed(message)
                }
            }
        };

        if let SendOutcome::Replied {
            message,
            feedback_scheduled: true,
        } = &outcome
        {
            self.schedule_feedback_request(message.message_id().cloned());
        }

        outcome
    }

    /// Opens the session, then sends `text`.
    pub async fn open_and_send(&self, text: &str) -> SendOutcome {
        self.open();
        self.send_message(text).await
    }

    /// Opens the feedback prompt for this session.
    ///
    /// An already open prompt is replaced by a fresh one.
    pub fn request_feedback(&self) {
        self.open_feedback(None);
    }

    /// Records the chosen feedback type. Returns `false` when no prompt is
    /// open or its submission is already running.
    pub fn select_feedback_type(&self, feedback_type: FeedbackType) -> bool {
        {
            let mut state = self.lock();
            let Some(pending) = state.pending.as_mut() else {
                return false;
            };
            if pending.is_in_flight() {
                return false;
            }
            pending.select(feedback_type);
        }
        self.emit(SessionEvent::FeedbackTypeSelected(feedback_type));
        true
    }

    /// Closes the feedback prompt without sending anything.
    pub fn dismiss_feedback(&self) -> bool {
        let dismissed = self.lock().pending.take().is_some();
        if dismissed {
            self.emit(SessionEvent::FeedbackClosed);
        }
        dismissed
    }

    /// Sends the selected feedback with an optional comment.
    ///
    /// The prompt is closed once the request settles. Failures are logged
    /// only; success appends a localized thank-you.
    pub async fn submit_feedback(&self, comment: &str) -> FeedbackOutcome {
        let (request, ticket) = {
            let mut state = self.lock();
            let Some(pending) = state.pending.as_mut() else {
                return FeedbackOutcome::Ignored;
            };
            let Some(feedback_type) = pending.feedback_type() else {
                return FeedbackOutcome::Ignored;
            };
            if pending.is_in_flight() {
                return FeedbackOutcome::Ignored;
            }
            pending.mark_in_flight();

            let comment = comment.trim();
            let request = FeedbackRequest {
                session_id: pending.session_id().to_string(),
                feedback_type,
                comment: (!comment.is_empty()).then(|| comment.to_string()),
            };
            (request, pending.ticket())
        };

        let result = self.shared.api.feedback(&request).await;

        let mut state = self.lock();
        if state.pending.as_ref().is_some_and(|p| p.ticket() == ticket) {
            state.pending = None;
            self.emit(SessionEvent::FeedbackClosed);
        }

        match result {
            Ok(()) => {
                let thank_you = Message::system(state.language.strings().thank_you);
                self.append(&mut state, thank_you);
                FeedbackOutcome::Submitted
            }
            Err(err) => {
                tracing::warn!(error = %err, "feedback submission failed");
                FeedbackOutcome::Failed
            }
        }
    }

    /// Rates one reply without going through the feedback prompt.
    ///
    /// Replaces any earlier rating of the same message and sends the
    /// feedback in the background. Returns `None` when `message_id` does not
    /// name a rateable reply of this session.
    pub fn submit_inline_feedback(
        &self,
        feedback_type: FeedbackType,
        message_id: &MessageId,
    ) -> Option<JoinHandle<()>> {
        {
            let mut state = self.lock();
            let known = state
                .transcript
                .iter()
                .any(|m| m.is_rateable() && m.message_id() == Some(message_id));
            if !known {
                tracing::debug!(%message_id, "inline feedback for unknown message ignored");
                return None;
            }
            state.inline.insert(message_id.clone(), feedback_type);
        }
        self.emit(SessionEvent::InlineFeedbackSelected {
            message_id: message_id.clone(),
            feedback_type,
        });

        let api = Arc::clone(&self.shared.api);
        let request = FeedbackRequest {
            session_id: self.shared.identity.session_id().to_string(),
            feedback_type,
            comment: None,
        };
        Some(tokio::spawn(async move {
            if let Err(err) = api.feedback(&request).await {
                tracing::warn!(error = %err, "inline feedback failed");
            }
        }))
    }

    fn open_feedback(&self, correlated: Option<MessageId>) {
        {
            let mut state = self.lock();
            let ticket = state.next_ticket;
            state.next_ticket += 1;
            state.pending = Some(PendingFeedback::new(
                self.shared.identity.session_id().to_string(),
                correlated,
                ticket,
            ));
        }
        self.emit(SessionEvent::FeedbackRequested);
    }

    fn schedule_feedback_request(&self, correlated: Option<MessageId>) {
        let session = self.clone();
        let delay = self.shared.options.feedback_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.open_feedback(correlated);
        });
    }

    fn append(&self, state: &mut State, message: Message) {
        if !state.is_open {
            state.unread += 1;
        }
        state.transcript.push(message.clone());
        self.emit(SessionEvent::MessageAppended(message));
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.shared.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Re-enables sending when the in-flight send finishes, however it ends.
struct SendingGuard<'a> {
    session: &'a ChatSession,
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.session.lock().sending = false;
        self.session.emit(SessionEvent::SendingChanged(false));
    }
}
