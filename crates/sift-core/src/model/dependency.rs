use serde::{Deserialize, Serialize};

/// Relationship kinds between beads. Only `Blocks` is graph-constrained
/// (must stay acyclic); the other two are annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    Blocks,
    Parent,
    RelatesTo,
}

impl DependencyType {
    /// Parse the wire name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "blocks" => Some(Self::Blocks),
            "parent" => Some(Self::Parent),
            "relates-to" => Some(Self::RelatesTo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Parent => "parent",
            Self::RelatesTo => "relates-to",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed edge between two stable bead IDs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeadDependency {
    pub from_id: String,
    pub to_id: String,
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(DependencyType::parse("blocks"), Some(DependencyType::Blocks));
        assert_eq!(DependencyType::parse("parent"), Some(DependencyType::Parent));
        assert_eq!(
            DependencyType::parse(" relates-to "),
            Some(DependencyType::RelatesTo)
        );
        assert_eq!(DependencyType::parse("duplicates"), None);
        assert_eq!(DependencyType::parse(""), None);
    }

    #[test]
    fn test_wire_names_match_parse() {
        for t in [
            DependencyType::Blocks,
            DependencyType::Parent,
            DependencyType::RelatesTo,
        ] {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(DependencyType::parse(t.as_str()), Some(t));
        }
    }
}
