use crate::assist::llm::ChatClient;
use crate::assist::{Message, Role};

const CHAT_SYSTEM: &str = "You are a helpful assistant that answers questions based on the text. \
     The text will be provided to you below. Answer the question based on the \
     text. If you don't know, say 'I don't know'. Answer in short concise \
     sentences. Say max 3 sentences.";

const FALLBACK_REPLY: &str = "The reading assistant is not reachable right now. Check your network \
     connection and API key, then ask again.";

/// How much recent conversation rides along with each question.
const HISTORY_WINDOW: usize = 8;

/// Rolling conversation about the text being studied. Lives as long as the
/// exercise session and is discarded with it.
#[derive(Default)]
pub struct ChatSession {
    pub messages: Vec<Message>,
    /// True when the last question fell back to the canned reply.
    pub last_failed: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask about the studied text. The exchange is always recorded; when the
    /// model cannot be reached the reply is a canned notice rather than an
    /// error state.
    pub fn ask(&mut self, client: Option<&ChatClient>, context: &str, question: &str) {
        self.messages.push(Message::user(question));

        let reply = client.and_then(|client| {
            let mut wire = vec![Message {
                role: Role::System,
                content: context.to_string(),
            }];
            let start = self.messages.len().saturating_sub(HISTORY_WINDOW);
            wire.extend(self.messages[start..].iter().cloned());
            client.complete(CHAT_SYSTEM, &wire).ok()
        });

        self.last_failed = reply.is_none();
        self.messages
            .push(Message::assistant(reply.unwrap_or_else(|| FALLBACK_REPLY.to_string())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_is_recorded_even_without_a_client() {
        let mut chat = ChatSession::new();
        chat.ask(None, "Some studied text.", "What is this about?");

        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, Role::User);
        assert_eq!(chat.messages[1].role, Role::Assistant);
        assert!(chat.last_failed);
        assert!(chat.messages[1].content.contains("not reachable"));
    }

    #[test]
    fn history_accumulates_across_questions() {
        let mut chat = ChatSession::new();
        chat.ask(None, "ctx", "first");
        chat.ask(None, "ctx", "second");
        assert_eq!(chat.messages.len(), 4);
        assert_eq!(chat.messages[2].content, "second");
    }
}
