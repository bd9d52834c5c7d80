//! Role-tagged conversation turns.
//!
//! A [`Conversation`] is write-once per request: turns are appended in
//! submission order and never removed. Derived views (for example "every turn
//! except the final question") are returned as owned copies so no two
//! requests ever share turn storage.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Role of a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

impl Role {
    /// Parses a role string (case-insensitive, surrounding whitespace ignored).
    ///
    /// Returns `None` for unrecognised roles.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    content: String,
}

impl ConversationTurn {
    /// Creates a turn.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Role of the turn's author.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Text content of the turn.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered, append-only sequence of conversation turns.
///
/// Holds at most one system turn, and only in the leading position.
/// User and assistant turns are kept in the order they were appended; strict
/// alternation is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    /// Creates an empty conversation.
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Builds a conversation from inbound `(role, content)` pairs.
    ///
    /// Roles are matched case-insensitively. `user` and `assistant` turns are
    /// kept in order. Inbound `system` turns are dropped: the orchestrators
    /// supply their own system prompt.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConversation`] for an unrecognised role.
    /// An empty input is accepted here and rejected by the orchestrators.
    pub fn from_inbound<'a, I>(messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut conversation = Self::new();
        for (index, (role, content)) in messages.into_iter().enumerate() {
            match Role::parse(role) {
                Some(Role::User) => conversation.append_user(content),
                Some(Role::Assistant) => conversation.append_assistant(content),
                Some(Role::System) => {}
                None => {
                    return Err(RagError::InvalidConversation {
                        message: format!("message {index} has unknown role '{role}'"),
                    });
                }
            }
        }
        Ok(conversation)
    }

    /// Appends the leading system turn.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConversation`] if any turn already exists.
    pub fn append_system(&mut self, content: impl Into<String>) -> Result<()> {
        if !self.turns.is_empty() {
            return Err(RagError::InvalidConversation {
                message: "a system turn may only lead the conversation".to_string(),
            });
        }
        self.turns.push(ConversationTurn::new(Role::System, content));
        Ok(())
    }

    /// Appends a user turn.
    pub fn append_user(&mut self, content: impl Into<String>) {
        self.turns.push(ConversationTurn::new(Role::User, content));
    }

    /// Appends an assistant turn.
    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ConversationTurn::new(Role::Assistant, content));
    }

    /// All turns in submission order.
    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Number of turns, including a leading system turn.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if no turns were appended.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// User and assistant turns, in order.
    pub fn dialogue(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().filter(|t| t.role != Role::System)
    }

    /// Returns `true` if there are no user or assistant turns.
    #[must_use]
    pub fn has_no_dialogue(&self) -> bool {
        self.dialogue().next().is_none()
    }

    /// Splits off the final user turn.
    ///
    /// Returns the question text and an owned copy of every other dialogue
    /// turn in order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyConversation`] with no dialogue, or
    /// [`RagError::InvalidConversation`] if no user turn exists.
    pub fn split_last_question(&self) -> Result<(String, Vec<ConversationTurn>)> {
        if self.has_no_dialogue() {
            return Err(RagError::EmptyConversation);
        }

        let dialogue: Vec<&ConversationTurn> = self.dialogue().collect();
        let position = dialogue
            .iter()
            .rposition(|t| t.role == Role::User)
            .ok_or_else(|| RagError::InvalidConversation {
                message: "conversation has no user turn to answer".to_string(),
            })?;

        let question = dialogue[position].content.clone();
        let rest = dialogue
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != position)
            .map(|(_, t)| (*t).clone())
            .collect();

        Ok((question, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("user", Some(Role::User); "lower user")]
    #[test_case("USER", Some(Role::User); "upper user")]
    #[test_case(" Assistant ", Some(Role::Assistant); "padded assistant")]
    #[test_case("system", Some(Role::System); "system")]
    #[test_case("tool", None; "tool is not a conversation role")]
    #[test_case("", None; "empty")]
    fn test_role_parse(input: &str, expected: Option<Role>) {
        assert_eq!(Role::parse(input), expected);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut c = Conversation::new();
        c.append_user("first");
        c.append_assistant("second");
        c.append_user("third");
        let contents: Vec<&str> = c.turns().iter().map(ConversationTurn::content).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn test_system_turn_must_lead() {
        let mut c = Conversation::new();
        assert!(c.append_system("rules").is_ok());
        c.append_user("hi");
        let err = c.append_system("again");
        assert!(matches!(err, Err(RagError::InvalidConversation { .. })));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_second_leading_system_rejected() {
        let mut c = Conversation::new();
        assert!(c.append_system("one").is_ok());
        assert!(c.append_system("two").is_err());
    }

    #[test]
    fn test_from_inbound_drops_system_and_keeps_order() {
        let c = Conversation::from_inbound([
            ("system", "ignored"),
            ("User", "q1"),
            ("assistant", "a1"),
            ("user", "q2"),
        ])
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(c.len(), 3);
        assert_eq!(c.turns()[0].role(), Role::User);
        assert_eq!(c.turns()[2].content(), "q2");
    }

    #[test]
    fn test_from_inbound_rejects_unknown_role() {
        let err = Conversation::from_inbound([("user", "q"), ("robot", "beep")]);
        assert!(matches!(err, Err(RagError::InvalidConversation { .. })));
    }

    #[test]
    fn test_from_inbound_empty_is_accepted() {
        let c = Conversation::from_inbound(std::iter::empty())
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert!(c.is_empty());
        assert!(c.has_no_dialogue());
    }

    #[test]
    fn test_split_last_question() {
        let mut c = Conversation::new();
        c.append_user("q1");
        c.append_assistant("a1");
        c.append_user("q2");
        let (question, rest) = c
            .split_last_question()
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(question, "q2");
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1].content(), "a1");
        // Source conversation untouched
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_split_last_question_keeps_trailing_assistant() {
        let mut c = Conversation::new();
        c.append_user("q1");
        c.append_assistant("a1");
        let (question, rest) = c
            .split_last_question()
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(question, "q1");
        assert_eq!(rest, vec![ConversationTurn::new(Role::Assistant, "a1")]);
    }

    #[test]
    fn test_split_last_question_errors() {
        assert!(matches!(
            Conversation::new().split_last_question(),
            Err(RagError::EmptyConversation)
        ));

        let mut only_assistant = Conversation::new();
        only_assistant.append_assistant("hello");
        assert!(matches!(
            only_assistant.split_last_question(),
            Err(RagError::InvalidConversation { .. })
        ));
    }

    #[test]
    fn test_system_only_has_no_dialogue() {
        let mut c = Conversation::new();
        assert!(c.append_system("rules").is_ok());
        assert!(!c.is_empty());
        assert!(c.has_no_dialogue());
    }
}
