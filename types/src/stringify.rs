//! Rendering helpers shared by every container's `Display` implementation.
//!
//! Containers render themselves as `Present { <value> }`, `Success { <value> }`
//! and so on, delegating the payload to its own `Display`. Payloads without a
//! `Display` implementation go through [`stringify`], which falls back to a
//! fixed sentinel when serialization fails.

use std::fmt;

use serde::Serialize;

/// Rendered in place of a payload that cannot be serialized.
pub const UNSERIALIZABLE: &str = "[unserializable]";

/// Rendered in place of a pending container's unresolved value.
pub const PENDING_PLACEHOLDER: &str = "<pending>";

/// Serialize a value to compact JSON, or [`UNSERIALIZABLE`] on failure.
#[must_use]
pub fn stringify<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| UNSERIALIZABLE.to_string())
}

/// Adapter giving any serializable payload a `Display` implementation.
///
/// ```
/// use vessel_types::Json;
///
/// #[derive(serde::Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(Json(Point { x: 1, y: 2 }).to_string(), r#"{"x":1,"y":2}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Json<T>(pub T);

impl<T: Serialize> fmt::Display for Json<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(&self.0))
    }
}

/// Write a `Name { payload }` rendering.
pub fn write_variant(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    payload: &dyn fmt::Display,
) -> fmt::Result {
    write!(f, "{name} {{ {payload} }}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serializer;

    use super::*;

    struct Refuses;

    impl Serialize for Refuses {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[test]
    fn serializable_values_render_as_json() {
        assert_eq!(stringify(&42), "42");
        assert_eq!(stringify("text"), "\"text\"");
        assert_eq!(stringify(&vec![1, 2]), "[1,2]");
    }

    #[test]
    fn failed_serialization_uses_sentinel() {
        assert_eq!(stringify(&Refuses), UNSERIALIZABLE);
        assert_eq!(Json(Refuses).to_string(), UNSERIALIZABLE);
    }

    #[test]
    fn non_string_map_keys_are_unserializable() {
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        assert_eq!(stringify(&map), UNSERIALIZABLE);
    }

    #[test]
    fn variant_rendering_wraps_payload() {
        struct Probe;
        impl fmt::Display for Probe {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_variant(f, "Present", &7)
            }
        }
        assert_eq!(Probe.to_string(), "Present { 7 }");
    }
}
