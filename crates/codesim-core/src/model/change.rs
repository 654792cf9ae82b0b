use serde::{Deserialize, Serialize};

/// How a node relates across the two compared trees.
///
/// Destination nodes get every kind except `Delete`, which only describes
/// source nodes that have no counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    #[default]
    None,
    Update,
    Insert,
    Move,
    UpdateMove,
    Delete,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::None => write!(f, "none"),
            ChangeKind::Update => write!(f, "update"),
            ChangeKind::Insert => write!(f, "insert"),
            ChangeKind::Move => write!(f, "move"),
            ChangeKind::UpdateMove => write!(f, "updatemove"),
            ChangeKind::Delete => write!(f, "delete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_display() {
        for kind in [
            ChangeKind::None,
            ChangeKind::Update,
            ChangeKind::Insert,
            ChangeKind::Move,
            ChangeKind::UpdateMove,
            ChangeKind::Delete,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
