use crate::api::ApiError;

const GREETING: &str =
    "Hi! I'm your AI financial assistant. Ask me anything about your expenses.";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// The conversation transcript. Entries are append-only in call order;
/// nothing is ever edited or removed, and failures land in the
/// transcript itself rather than in any error banner.
#[derive(Clone, PartialEq, Debug)]
pub struct Conversation {
    entries: Vec<ChatEntry>,
    busy: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            entries: vec![ChatEntry {
                speaker: Speaker::Assistant,
                text: GREETING.to_string(),
            }],
            busy: false,
        }
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Appends the user's entry and returns the query to send, or
    /// `None` for blank input or while a send is still in flight.
    pub fn begin(&mut self, input: &str) -> Option<String> {
        let query = input.trim();
        if query.is_empty() || self.busy {
            return None;
        }

        self.entries.push(ChatEntry {
            speaker: Speaker::User,
            text: query.to_string(),
        });
        self.busy = true;
        Some(query.to_string())
    }

    /// Appends the assistant's reply, or the error entry standing in
    /// for it. Busy clears either way.
    pub fn finish(&mut self, outcome: Result<String, ApiError>) {
        let text = match outcome {
            Ok(reply) => reply,
            Err(error) => format!("Sorry, I ran into an error: {error}"),
        };

        self.entries.push(ChatEntry {
            speaker: Speaker::Assistant,
            text,
        });
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, Speaker};
    use crate::api::ApiError;

    #[test]
    fn starts_with_the_assistant_greeting() {
        let conversation = Conversation::new();

        assert_eq!(conversation.entries().len(), 1);
        assert_eq!(conversation.entries()[0].speaker, Speaker::Assistant);
        assert!(!conversation.busy());
    }

    #[test]
    fn blank_input_leaves_the_transcript_unchanged() {
        let mut conversation = Conversation::new();

        assert_eq!(conversation.begin(""), None);
        assert_eq!(conversation.begin("   "), None);
        assert_eq!(conversation.entries().len(), 1);
        assert!(!conversation.busy());
    }

    #[test]
    fn successful_send_adds_exactly_two_entries() {
        let mut conversation = Conversation::new();

        let query = conversation.begin("  How much on food?  ").unwrap();
        assert_eq!(query, "How much on food?");
        assert_eq!(conversation.entries().len(), 2);
        assert_eq!(conversation.entries()[1].speaker, Speaker::User);
        assert_eq!(conversation.entries()[1].text, "How much on food?");

        conversation.finish(Ok("About \u{20b9}450 this month.".to_string()));
        assert_eq!(conversation.entries().len(), 3);
        assert_eq!(conversation.entries()[2].speaker, Speaker::Assistant);
        assert!(!conversation.busy());
    }

    #[test]
    fn failed_send_adds_an_error_entry_instead() {
        let mut conversation = Conversation::new();
        conversation.begin("hello");

        conversation.finish(Err(ApiError::Server("model overloaded".to_string())));

        assert_eq!(conversation.entries().len(), 3);
        assert_eq!(
            conversation.entries()[2].text,
            "Sorry, I ran into an error: model overloaded"
        );
        assert!(!conversation.busy());
    }

    #[test]
    fn sends_are_rejected_while_one_is_in_flight() {
        let mut conversation = Conversation::new();
        conversation.begin("first");

        assert_eq!(conversation.begin("second"), None);
        assert_eq!(conversation.entries().len(), 2);

        conversation.finish(Ok("done".to_string()));
        assert!(conversation.begin("second").is_some());
    }
}
