use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Speaker of a recorded turn.
///
/// On the wire the game master is tagged `"ai"` and the player `"user"`.
/// Any other value, including `null` or a non-string, is read as the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum Role {
    /// The player, i.e. the nurse being trained.
    #[default]
    User,
    /// The game master, i.e. the external model.
    Assistant,
}

impl Role {
    const ASSISTANT_TAG: &'static str = "ai";
    const USER_TAG: &'static str = "user";

    /// Returns the wire tag of this role.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::User => Self::USER_TAG,
            Self::Assistant => Self::ASSISTANT_TAG,
        }
    }
}

impl From<Value> for Role {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some(Self::ASSISTANT_TAG) => Self::Assistant,
            _ => Self::User,
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.tag().to_string()
    }
}

/// A single visible exchange unit of the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

impl Turn {
    /// Creates a player turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Creates a game master turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Conversation history in chronological order, owned by the client.
pub type History = Vec<Turn>;

/// `deserialize_with` helper that reads an explicit `null` as the default value.
///
/// Pair it with `#[serde(default)]` so that an absent field is defaulted too.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
