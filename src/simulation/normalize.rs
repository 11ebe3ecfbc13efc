use super::history::{Role, Turn};

/// Inserted between texts of consecutive same-role entries when they are merged.
pub const MERGE_SEPARATOR: &str = "\n\n---\n";

/// Role classes accepted by the chat API, which requires them to alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    User,
    Model,
}

impl From<Role> for RoleClass {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Assistant => Self::Model,
        }
    }
}

/// A message ready to be sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMessage {
    pub role: RoleClass,
    pub text: String,
}

/// Builds a role-alternating message list out of the system instruction, the history
/// and the new player message.
///
/// The instruction is treated as a user-class message, so it merges with any user
/// turn right after it. Merging concatenates with [`MERGE_SEPARATOR`] and never drops text.
pub fn normalize(instruction: &str, history: &[Turn], message: &str) -> Vec<NormalizedMessage> {
    let items = std::iter::once((RoleClass::User, instruction))
        .chain(
            history
                .iter()
                .map(|turn| (RoleClass::from(turn.role), turn.text.as_str())),
        )
        .chain(std::iter::once((RoleClass::User, message)));

    let mut output: Vec<NormalizedMessage> = Vec::with_capacity(history.len() + 2);
    for (role, text) in items {
        match output.last_mut() {
            Some(last) if last.role == role => {
                last.text.push_str(MERGE_SEPARATOR);
                last.text.push_str(text);
            }
            _ => output.push(NormalizedMessage {
                role,
                text: text.to_string(),
            }),
        }
    }

    output
}
