// Normalization of the provider's text payload into flashcards.
//
// The payload must be a JSON array of objects with non-empty string fields
// `term` and `definition`. Anything else is rejected whole; no partial
// deck is ever produced. Array length is NOT checked against the requested
// count — a provider returning a different number of cards is tolerated.

use serde::Deserialize;
use serde_json::Value;

use crate::deck::{self, Flashcard};

use super::GenerationError;

/// One element of the provider payload, as declared in the response schema.
/// `serde_json::from_value` fails on a missing field, which is exactly the
/// reject-don't-coerce behavior the normalizer wants.
#[derive(Debug, Deserialize)]
struct RawCard {
    term: String,
    definition: String,
}

/// Parse the provider text payload and mint a flashcard batch.
///
/// Fails with `GenerationError::Parse` when the payload is not JSON or the
/// top-level value is not an array, and with `GenerationError::Schema` when
/// any element is missing `term`/`definition` or carries an empty value.
pub fn normalize_cards(payload: &str) -> Result<Vec<Flashcard>, GenerationError> {
    let value: Value =
        serde_json::from_str(payload.trim()).map_err(|e| GenerationError::Parse {
            reason: e.to_string(),
        })?;

    let Value::Array(elements) = value else {
        return Err(GenerationError::Parse {
            reason: "top-level value is not an array".to_string(),
        });
    };

    let batch = deck::next_batch();
    let mut cards = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        let raw: RawCard =
            serde_json::from_value(element).map_err(|e| GenerationError::Schema {
                index,
                reason: e.to_string(),
            })?;

        if raw.term.trim().is_empty() {
            return Err(GenerationError::Schema {
                index,
                reason: "`term` is empty".to_string(),
            });
        }
        if raw.definition.trim().is_empty() {
            return Err(GenerationError::Schema {
                index,
                reason: "`definition` is empty".to_string(),
            });
        }

        cards.push(Flashcard {
            id: deck::card_id(batch, index),
            term: raw.term,
            definition: raw.definition,
        });
    }

    Ok(cards)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
