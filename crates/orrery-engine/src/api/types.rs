use std::borrow::Borrow;
use std::fmt;
use serde::{Deserialize, Serialize};

/// Stable string key of a celestial body. Used for picking, selection and labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub String);

impl BodyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BodyId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for BodyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for BodyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BodyId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BodyId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Unique identifier for a renderable node (body node, ring, belt rock, orbit path).
/// Never reused within one registry, so a stale id cannot alias a rebuilt node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Notification from the engine to the host UI.
/// Selection decisions stay with the UI; these only report what the pointer hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OrreryEvent {
    /// A click resolved to a body (`None` means the click missed: deselect).
    Picked { id: Option<BodyId> },
    /// The body under the pointer changed.
    Hovered { id: Option<BodyId> },
    /// A snapshot was accepted and the scene rebuilt.
    Rebuilt { bodies: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_id_compares_with_str() {
        let id = BodyId::from("earth");
        assert_eq!(id, "earth");
        assert_eq!(id.to_string(), "earth");
    }

    #[test]
    fn event_serializes_tagged() {
        let json = serde_json::to_string(&OrreryEvent::Picked { id: Some(BodyId::from("mars")) }).unwrap();
        assert_eq!(json, r#"{"type":"picked","id":"mars"}"#);
        let json = serde_json::to_string(&OrreryEvent::Hovered { id: None }).unwrap();
        assert_eq!(json, r#"{"type":"hovered","id":null}"#);
    }
}
