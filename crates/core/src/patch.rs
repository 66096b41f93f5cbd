//! Deserialization support for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize a doubly-optional patch field so that an explicit `null`
/// clears the value instead of keeping it.
///
/// Pair with `#[serde(default)]` on an `Option<Option<T>>` field: an absent
/// key stays `None` (keep), `null` becomes `Some(None)` (clear), and a value
/// becomes `Some(Some(v))` (set).
pub fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "clearable")]
        nick: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.nick, None);

        let cleared: Payload = serde_json::from_str(r#"{"nick":null}"#).unwrap();
        assert_eq!(cleared.nick, Some(None));

        let set: Payload = serde_json::from_str(r#"{"nick":"ada"}"#).unwrap();
        assert_eq!(set.nick, Some(Some("ada".to_string())));
    }
}
