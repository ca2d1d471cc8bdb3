//! Assistant chat session and the completion service seam.
//!
//! A [`ChatSession`] owns one transcript. Sending a message appends it,
//! appends a transient "thinking" placeholder, and produces a
//! [`CompletionRequest`]. Whoever runs the request (the host's async task,
//! or [`ChatSession::send`] directly) hands the outcome back through
//! [`ChatSession::finish`], which swaps the placeholder for the reply or for
//! a readable error.
//!
//! The [`CompletionService`] trait abstracts the remote model. The HTTP
//! implementation lives in `greentrack-llm`; [`StubCompletionService`]
//! returns a canned outcome for tests.

use std::future::Future;
use std::sync::Mutex;

use greentrack_content::ChatContent;
use greentrack_types::{ChatMessage, MessageId, SessionId};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Completion service
// ---------------------------------------------------------------------------

/// Broad class of a completion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCategory {
    /// The request could not be built from the configuration.
    Configuration,
    /// The request did not complete (network, timeout).
    Transport,
    /// A response arrived but was not usable.
    Protocol,
}

/// Errors a completion service can report.
///
/// Every variant maps to its own transcript message, see
/// [`CompletionError::transcript_message`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// The configured endpoint or credentials cannot form a request.
    #[error("invalid completion setup: {reason}")]
    Setup {
        /// What is wrong with the setup.
        reason: String,
    },

    /// No API key was found in the environment.
    #[error("no API key found in {variable}")]
    MissingCredentials {
        /// The environment variable that should hold the key.
        variable: String,
    },

    /// The request body could not be encoded.
    #[error("failed to encode completion request: {reason}")]
    Serialization {
        /// The underlying encoder error.
        reason: String,
    },

    /// The request failed in transit.
    #[error("completion request failed: {reason}")]
    Transport {
        /// The underlying transport error.
        reason: String,
    },

    /// The service answered with a non-success status.
    #[error("completion service returned status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("failed to decode completion response: {reason}")]
    Decode {
        /// The underlying decoder error.
        reason: String,
    },

    /// The response decoded but carried no reply text.
    #[error("completion response contained no content")]
    Empty,
}

impl CompletionError {
    /// Which broad class this failure belongs to.
    pub const fn category(&self) -> FaultCategory {
        match self {
            Self::Setup { .. } | Self::MissingCredentials { .. } | Self::Serialization { .. } => {
                FaultCategory::Configuration
            }
            Self::Transport { .. } => FaultCategory::Transport,
            Self::Rejected { .. } | Self::Decode { .. } | Self::Empty => FaultCategory::Protocol,
        }
    }

    /// The assistant message shown in place of a reply.
    pub fn transcript_message(&self) -> String {
        match self {
            Self::Setup { .. } => "Error: Invalid API endpoint".to_owned(),
            Self::MissingCredentials { variable } => {
                format!("Error: No API key configured. Set {variable} and try again.")
            }
            Self::Serialization { .. } => "Error preparing request".to_owned(),
            Self::Transport { reason } => {
                format!("Error: Could not reach the assistant service ({reason})")
            }
            Self::Rejected { status } => {
                format!("Error: The assistant service responded with status {status}")
            }
            Self::Decode { .. } => "Error processing response".to_owned(),
            Self::Empty => "Error: No content returned by the assistant service".to_owned(),
        }
    }
}

/// One request to the completion service: a system instruction and a
/// single user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// The user's message.
    pub user: String,
}

/// A remote model that turns a [`CompletionRequest`] into reply text.
pub trait CompletionService {
    /// Request a completion.
    ///
    /// # Errors
    ///
    /// Returns a [`CompletionError`] describing which stage failed.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

/// A completion service that returns a fixed outcome and records requests.
#[derive(Debug)]
pub struct StubCompletionService {
    outcome: Result<String, CompletionError>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletionService {
    /// A stub that always replies with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(text.into()))
    }

    /// A stub that always fails with `error`.
    pub fn failing(error: CompletionError) -> Self {
        Self::with_outcome(Err(error))
    }

    const fn with_outcome(outcome: Result<String, CompletionError>) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl CompletionService for StubCompletionService {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }
        std::future::ready(self.outcome.clone())
    }
}

// ---------------------------------------------------------------------------
// Chat session
// ---------------------------------------------------------------------------

/// A request issued by [`ChatSession::begin_send`], to be completed and
/// handed back through [`ChatSession::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCompletion {
    /// Session that issued the request.
    pub session: SessionId,
    /// The request to run.
    pub request: CompletionRequest,
}

/// Transcript and input buffer of one visit to the chat screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    id: SessionId,
    system_prompt: String,
    placeholder_text: String,
    messages: Vec<ChatMessage>,
    input: String,
    waiting: Option<MessageId>,
}

impl ChatSession {
    /// Open a session whose transcript starts with the greeting.
    pub fn new(content: &ChatContent, system_prompt: impl Into<String>) -> Self {
        let id = SessionId::new();
        info!(session = %id, "Chat session opened");
        Self {
            id,
            system_prompt: system_prompt.into(),
            placeholder_text: content.placeholder.clone(),
            messages: vec![ChatMessage::assistant(content.greeting.clone())],
            input: String::new(),
            waiting: None,
        }
    }

    /// Identity used to match replies to this session.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The transcript in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a reply is outstanding.
    pub const fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// Current contents of the input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send the input buffer, clearing it if the send is accepted.
    pub fn submit_input(&mut self) -> Option<PendingCompletion> {
        let text = self.input.clone();
        let pending = self.begin_send(&text);
        if pending.is_some() {
            self.input.clear();
        }
        pending
    }

    /// Append `text` and a placeholder, and build the request for it.
    ///
    /// Returns `None` and leaves the transcript untouched when `text` is
    /// blank or a reply is already outstanding.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingCompletion> {
        if text.trim().is_empty() {
            debug!(session = %self.id, "Ignoring empty chat message");
            return None;
        }
        if self.waiting.is_some() {
            debug!(session = %self.id, "Ignoring chat message while a reply is pending");
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        let placeholder = ChatMessage::placeholder(self.placeholder_text.clone());
        self.waiting = Some(placeholder.id);
        self.messages.push(placeholder);
        debug!(session = %self.id, chars = text.len(), "Chat message sent");

        Some(PendingCompletion {
            session: self.id,
            request: CompletionRequest {
                system: self.system_prompt.clone(),
                user: text.to_owned(),
            },
        })
    }

    /// Deliver the outcome of a request issued by this session.
    ///
    /// Removes the placeholder and appends the reply, or the error's
    /// transcript message. Returns `false` and changes nothing if the
    /// outcome belongs to another session or nothing is pending.
    pub fn finish(&mut self, session: SessionId, outcome: Result<String, CompletionError>) -> bool {
        if session != self.id {
            debug!(session = %session, current = %self.id, "Discarding reply for another session");
            return false;
        }
        let Some(placeholder) = self.waiting.take() else {
            debug!(session = %self.id, "Discarding reply with nothing pending");
            return false;
        };
        self.messages.retain(|m| m.id != placeholder);

        let message = match outcome {
            Ok(reply) => {
                info!(session = %self.id, chars = reply.len(), "Assistant replied");
                ChatMessage::assistant(reply)
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, category = ?err.category(), "Completion failed");
                ChatMessage::assistant(err.transcript_message())
            }
        };
        self.messages.push(message);
        true
    }

    /// Send `text` and wait for the reply in place.
    ///
    /// Returns `false` if the send was rejected.
    pub async fn send<S: CompletionService>(&mut self, service: &S, text: &str) -> bool {
        let Some(pending) = self.begin_send(text) else {
            return false;
        };
        let outcome = service.complete(&pending.request).await;
        self.finish(pending.session, outcome)
    }
}
