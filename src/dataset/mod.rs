//! Safety conversation records and their output schema.

pub mod schema;
pub mod types;

pub use schema::{safety_conversation_response_format, SCHEMA_NAME};
pub use types::{
    example_id, Conversation, Example, ExpectedAction, ExpectedBehavior, GeneratedPayload,
    Message, MustInclude, Role, DATASET_VERSION, ID_PREFIX, LANGUAGE, LOCALE, REQUIRED_FIELDS,
};
