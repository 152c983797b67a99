//! Structural checks for conversations.
//!
//! A conversation is valid when it has at least two messages, roles
//! alternate starting with `user`, every message has content, and the final
//! message comes from the assistant.

use crate::dataset::{Message, Role};
use crate::error::ValidationError;

/// Minimum number of messages in a valid conversation.
pub const MIN_MESSAGES: usize = 2;

/// Role required at position `index`.
pub fn expected_role(index: usize) -> Role {
    if index % 2 == 0 {
        Role::User
    } else {
        Role::Assistant
    }
}

/// Validates the shape of a conversation, failing on the first violation.
///
/// Only zero-length content counts as empty; whitespace is kept as written.
pub fn validate_messages(messages: &[Message]) -> Result<(), ValidationError> {
    if messages.len() < MIN_MESSAGES {
        return Err(ValidationError::TooFewMessages(messages.len()));
    }

    for (index, message) in messages.iter().enumerate() {
        let expected = expected_role(index);
        if message.role != expected {
            return Err(ValidationError::RoleMismatch {
                index,
                expected: expected.to_string(),
                actual: message.role.to_string(),
            });
        }
        if message.content.is_empty() {
            return Err(ValidationError::EmptyContent(index));
        }
    }

    match messages.last() {
        Some(last) if last.role == Role::Assistant => Ok(()),
        _ => Err(ValidationError::LastMessageNotAssistant),
    }
}
