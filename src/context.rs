use crate::providers::ChatMessage;

/// Most messages kept in a conversation context.
pub const MAX_CONTEXT_MESSAGES: usize = 20;

/// Sliding window of the most recent messages of one conversation.
///
/// Appends that push the length past [`MAX_CONTEXT_MESSAGES`] drop the oldest
/// messages first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    messages: Vec<ChatMessage>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.trim();
    }

    pub fn append_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(assistant));
        self.trim();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn trim(&mut self) {
        if self.messages.len() > MAX_CONTEXT_MESSAGES {
            let excess = self.messages.len() - MAX_CONTEXT_MESSAGES;
            self.messages.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Role;

    #[test]
    fn keeps_the_most_recent_twenty_in_order() {
        let mut context = ConversationContext::new();
        for i in 0..11 {
            context.append_turn(format!("q{}", i), format!("a{}", i));
        }

        assert_eq!(context.len(), MAX_CONTEXT_MESSAGES);

        let contents: Vec<&str> = context.iter().map(|m| m.content()).collect();
        let expected: Vec<String> = (1..11)
            .flat_map(|i| [format!("q{}", i), format!("a{}", i)])
            .collect();
        assert_eq!(contents, expected);
        assert_eq!(context.messages()[0].role(), Role::User);
        assert_eq!(context.messages()[19].role(), Role::Assistant);
    }

    #[test]
    fn single_appends_respect_the_cap() {
        let mut context = ConversationContext::new();
        for i in 0..25 {
            context.append(ChatMessage::user(i.to_string()));
        }
        assert_eq!(context.len(), MAX_CONTEXT_MESSAGES);
        assert_eq!(context.messages()[0].content(), "5");
        assert_eq!(context.messages()[19].content(), "24");
    }

    #[test]
    fn turns_append_user_then_assistant() {
        let mut context = ConversationContext::new();
        context.append_turn("question", "answer");
        assert_eq!(
            context.messages(),
            &[ChatMessage::user("question"), ChatMessage::assistant("answer")]
        );
    }

    #[test]
    fn clear_empties_the_window() {
        let mut context = ConversationContext::new();
        context.append_turn("a", "b");
        context.clear();
        assert!(context.is_empty());
        assert_eq!(context.len(), 0);
        assert!(context.messages().is_empty());
        assert_eq!(context.iter().count(), 0);
    }
}
