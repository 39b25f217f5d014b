//! Persisted form of an ingredient aggregate.
//!
//! Binary layout: the `BRIG` magic bytes, the schema version, then a bincode
//! payload holding the cook time and the `(kind, amount)` entries in order.
//! The text form is JSON carrying the same version and payload.

use crate::ingredients::IngredientAggregate;
use crate::recipe::{IngredientAmount, IngredientKind};
use brewery_common::{CodecError, CodecResult, MagicBytes, SchemaVersion};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest amount stored per entry.
pub const MAX_STORED_AMOUNT: u16 = i16::MAX as u16;

#[derive(Debug, Serialize, Deserialize)]
struct Payload<K> {
    cooked_time: u32,
    entries: Vec<(K, u16)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextForm<K> {
    version: SchemaVersion,
    #[serde(flatten)]
    payload: Payload<K>,
}

fn check_version(found: SchemaVersion) -> CodecResult<()> {
    let current = SchemaVersion::INGREDIENTS;
    if current.can_read(&found) {
        Ok(())
    } else {
        Err(CodecError::VersionMismatch {
            expected: current,
            found,
        })
    }
}

impl<K: IngredientKind> IngredientAggregate<K> {
    fn to_payload(&self) -> Payload<K> {
        let entries = self
            .entries()
            .iter()
            .map(|entry| {
                let amount = entry.amount.min(u32::from(MAX_STORED_AMOUNT)) as u16;
                if u32::from(amount) < entry.amount {
                    warn!(
                        ingredient = entry.ingredient.debug_id(),
                        amount = entry.amount,
                        "Clamping stored ingredient amount"
                    );
                }
                (entry.ingredient.clone(), amount)
            })
            .collect();
        Payload {
            cooked_time: self.cooked_time(),
            entries,
        }
    }

    fn from_payload(payload: Payload<K>) -> Self {
        let entries = payload
            .entries
            .into_iter()
            .map(|(ingredient, amount)| IngredientAmount::new(ingredient, u32::from(amount)));
        Self::from_parts(entries, payload.cooked_time)
    }
}

impl<K> IngredientAggregate<K>
where
    K: IngredientKind + Serialize + DeserializeOwned,
{
    /// Serializes to the versioned binary format.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(MagicBytes::INGREDIENTS.bytes());

        bincode::serialize_into(&mut buffer, &SchemaVersion::INGREDIENTS)
            .map_err(|e| CodecError::Serialization(e.to_string()))?;
        bincode::serialize_into(&mut buffer, &self.to_payload())
            .map_err(|e| CodecError::Serialization(e.to_string()))?;

        Ok(buffer)
    }

    /// Deserializes from the versioned binary format.
    ///
    /// Data from an unknown major version is rejected. Zero amounts are
    /// dropped and repeated kinds merged.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        if !MagicBytes::INGREDIENTS.prefixes(bytes) {
            return Err(CodecError::InvalidFormat);
        }

        let mut reader = &bytes[4..];
        let version: SchemaVersion = bincode::deserialize_from(&mut reader)
            .map_err(|e| CodecError::Corrupted(e.to_string()))?;
        check_version(version)?;

        let payload: Payload<K> = bincode::deserialize_from(&mut reader)
            .map_err(|e| CodecError::Corrupted(e.to_string()))?;
        Ok(Self::from_payload(payload))
    }

    /// Serializes to the versioned JSON text format.
    pub fn to_text(&self) -> CodecResult<String> {
        let form = TextForm {
            version: SchemaVersion::INGREDIENTS,
            payload: self.to_payload(),
        };
        serde_json::to_string(&form).map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Deserializes from the versioned JSON text format.
    pub fn from_text(text: &str) -> CodecResult<Self> {
        let form: TextForm<K> =
            serde_json::from_str(text).map_err(|e| CodecError::Corrupted(e.to_string()))?;
        check_version(form.version)?;
        Ok(Self::from_payload(form.payload))
    }
}
