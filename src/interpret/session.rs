use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

use super::client::CompletionClient;

/// First message every session opens with.
pub const WELCOME_MESSAGE: &str =
    "Welcome to Dream Interpreter! Share your dream, and I'll help interpret its meaning.";

/// Shown in place of a raw error when the inference call fails.
pub const FALLBACK_REPLY: &str =
    "I encountered an issue interpreting your dream. Please try again later.";

const SYSTEM_PROMPT: &str = "You are a mystical dream interpreter with expertise in \
     Jungian psychology, symbolism, and subconscious meaning.";

/// The instruction template the dream text is embedded into, verbatim.
fn interpretation_prompt(dream_text: &str) -> String {
    format!(
        "You are a mystical dream interpreter using psychological and symbolic \
         analysis to interpret dreams.\n\n\
         Analyze this dream in a mystical yet insightful tone:\n\
         \"{dream_text}\"\n\n\
         Your interpretation should include:\n\
         1. The key symbols and their potential meanings\n\
         2. Emotional undertones and their significance\n\
         3. Possible connections to the dreamer's waking life\n\
         4. Psychological insights drawing from archetypes and the collective unconscious\n\
         5. Potential messages or guidance the dream might be offering\n\n\
         Keep your interpretation mystical, introspective, yet grounded in \
         psychological understanding."
    )
}

/// Errors surfaced to the caller of `submit`. Inference failures are not
/// among them — those become the fallback reply.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("an interpretation is already in progress")]
    RequestInFlight,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

/// One line of the interpretation transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// Strictly increasing; insertion order is significant.
    pub sequence: u64,
}

/// A dream interpretation chat session.
///
/// Append-only message log driven by request/response round trips to the
/// inference collaborator. At most one request is outstanding at a time;
/// the log is never truncated or reordered. Session-scoped only — nothing
/// here is persisted.
pub struct InterpretationSession {
    client: Arc<dyn CompletionClient>,
    messages: Mutex<Vec<ChatMessage>>,
    next_sequence: AtomicU64,
    pending: AtomicBool,
}

impl InterpretationSession {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        // The log is seeded with the welcome message; it is never empty.
        let welcome = ChatMessage {
            sender: Sender::System,
            text: WELCOME_MESSAGE.to_string(),
            sequence: 0,
        };

        Self {
            client,
            messages: Mutex::new(vec![welcome]),
            next_sequence: AtomicU64::new(1),
            pending: AtomicBool::new(false),
        }
    }

    /// Submit dream text for interpretation.
    ///
    /// The user's message is appended before the request is dispatched.
    /// Empty input and submissions while a request is outstanding are
    /// rejected with no side effects. An inference failure appends the
    /// fixed fallback reply; the raw error goes to the log sink only.
    pub async fn submit(&self, user_text: &str) -> Result<(), InterpretError> {
        let trimmed = user_text.trim();
        if trimmed.is_empty() {
            return Err(InterpretError::EmptyMessage);
        }

        if self
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(InterpretError::RequestInFlight);
        }

        self.append(Sender::User, user_text.to_string()).await;

        info!("Dispatching interpretation request ({} chars)", trimmed.len());

        let prompt = interpretation_prompt(user_text);
        let reply = match self.client.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(interpretation) => interpretation,
            Err(e) => {
                error!("Interpretation failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };

        self.append(Sender::System, reply).await;
        self.pending.store(false, Ordering::SeqCst);

        Ok(())
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// The transcript so far, in insertion order.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    async fn append(&self, sender: Sender, text: String) {
        let mut messages = self.messages.lock().await;
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        messages.push(ChatMessage {
            sender,
            text,
            sequence,
        });
    }
}
