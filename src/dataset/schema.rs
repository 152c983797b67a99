//! Structured-output schema sent with every generation request.
//!
//! The service is asked to decode under this schema in strict mode; the
//! client still decodes the result into [`GeneratedPayload`](super::GeneratedPayload)
//! and treats any mismatch as a failure.

use serde_json::{json, Value};

/// Name of the schema as reported to the service.
pub const SCHEMA_NAME: &str = "safety_conversation";

/// Builds the `response_format` object for a chat-completions request.
pub fn safety_conversation_response_format() -> Value {
    let phrase_list = json!({
        "type": "array",
        "items": {"type": "string"}
    });

    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "messages": {
                        "type": "array",
                        "description": "Alternating user-assistant messages for SFT training",
                        "items": {
                            "type": "object",
                            "properties": {
                                "role": {
                                    "type": "string",
                                    "enum": ["user", "assistant"],
                                    "description": "Either 'user' or 'assistant'"
                                },
                                "content": {
                                    "type": "string",
                                    "description": "The message content"
                                }
                            },
                            "required": ["role", "content"],
                            "additionalProperties": false
                        }
                    },
                    "expected": {
                        "type": "object",
                        "properties": {
                            "expected_action": {
                                "type": "array",
                                "description": "Expected action for each user turn: REFUSE, SAFE_COMPLETE, CLARIFY, or SUPPORT",
                                "items": {"type": "string"}
                            },
                            "must_include": {
                                "type": "object",
                                "properties": {
                                    "REFUSE": phrase_list,
                                    "SUPPORT": phrase_list,
                                    "SAFE_COMPLETE": phrase_list
                                },
                                "required": ["REFUSE", "SUPPORT", "SAFE_COMPLETE"],
                                "additionalProperties": false
                            },
                            "must_not_include": phrase_list
                        },
                        "required": ["expected_action", "must_include", "must_not_include"],
                        "additionalProperties": false
                    },
                    "notes": {
                        "type": "string",
                        "description": "Brief note about the scenario"
                    }
                },
                "required": ["messages", "expected", "notes"],
                "additionalProperties": false
            }
        }
    })
}
