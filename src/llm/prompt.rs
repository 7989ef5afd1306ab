// Prompt and response-schema construction for flashcard generation.
//
// The instruction pins the exact card count and asks for brief,
// introductory definitions; the schema constrains the provider to a JSON
// array of {term, definition} objects so the normalizer has a fixed shape
// to validate against.

use serde_json::{json, Value};

/// Build the generation instruction for a topic and card count.
pub fn build_generation_prompt(topic: &str, count: u8) -> String {
    format!(
        "Generate a list of exactly {count} important terms and their brief \
         definitions for the topic: \"{topic}\". The definitions should be \
         concise and easy to understand."
    )
}

/// The machine-readable output schema sent alongside the prompt: an array
/// of objects, each with required string fields `term` and `definition`.
/// Type names are the provider's schema enums (uppercase).
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "term": {
                    "type": "STRING",
                    "description": "The term or concept name.",
                },
                "definition": {
                    "type": "STRING",
                    "description": "A brief introductory explanation of the term.",
                },
            },
            "required": ["term", "definition"],
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
