/// Speaker of one conversation turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// The party setting up the narrator (opening prompt).
    Requester,
    Narrator,
    Player,
}

impl Role {
    /// Role name understood by chat-completion endpoints.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Role::Requester | Role::Player => "user",
            Role::Narrator => "assistant",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Append-only log of the session. Never truncated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn seeded(opening_prompt: &str) -> Self {
        let mut history = Self::default();
        history.push(ConversationTurn::new(Role::Requester, opening_prompt));
        history
    }

    pub(crate) fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
