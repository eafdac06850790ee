//! Family relation model.
//!
//! # Responsibility
//! - Define the closed set of relation tags and their inverses.
//! - Define the directed edge persisted between two memorials.
//!
//! # Invariants
//! - An edge reads "target is `relation` of source".
//! - Unrecognized stored labels degrade to `RelationLabel::Other`.

use crate::model::memorial::MemorialId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Relation tag stated from the edge source's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationLabel {
    Parent,
    Child,
    Spouse,
    Sibling,
    #[serde(other)]
    Other,
}

impl RelationLabel {
    /// Display order used when grouping family members.
    pub const DISPLAY_ORDER: [RelationLabel; 5] = [
        RelationLabel::Parent,
        RelationLabel::Spouse,
        RelationLabel::Sibling,
        RelationLabel::Child,
        RelationLabel::Other,
    ];

    /// Role of the source party as seen from the target party.
    pub fn inverse(self) -> Self {
        match self {
            Self::Parent => Self::Child,
            Self::Child => Self::Parent,
            Self::Spouse => Self::Spouse,
            Self::Sibling => Self::Sibling,
            Self::Other => Self::Other,
        }
    }

    /// Parses a stored label; never fails.
    ///
    /// Read-side only: legacy or unrecognized text degrades to `Other`.
    /// Input from users goes through `FromStr` instead.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Self::Other)
    }

    /// Storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Child => "child",
            Self::Spouse => "spouse",
            Self::Sibling => "sibling",
            Self::Other => "other",
        }
    }
}

/// Relation text that names none of the known tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRelationLabel(pub String);

impl Display for UnknownRelationLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown relation `{}`; expected parent|child|spouse|sibling|other",
            self.0
        )
    }
}

impl Error for UnknownRelationLabel {}

impl FromStr for RelationLabel {
    type Err = UnknownRelationLabel;

    /// Accepts the English tag names in any case and the localized labels the
    /// publishing UI writes.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "parent" | "부모" | "부" | "모" => Ok(Self::Parent),
            "child" | "자녀" | "자식" => Ok(Self::Child),
            "spouse" | "배우자" => Ok(Self::Spouse),
            "sibling" | "형제자매" | "형제" | "자매" => Ok(Self::Sibling),
            "other" | "기타" => Ok(Self::Other),
            other => Err(UnknownRelationLabel(other.to_string())),
        }
    }
}

/// Directed, labeled link between two memorials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEdge {
    pub source_id: MemorialId,
    pub target_id: MemorialId,
    pub relation: RelationLabel,
}

impl FamilyEdge {
    pub fn new(
        source_id: impl Into<MemorialId>,
        target_id: impl Into<MemorialId>,
        relation: RelationLabel,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation,
        }
    }

    /// Whether the edge points back at its own source.
    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }
}

#[cfg(test)]
mod tests {
    use super::{RelationLabel, UnknownRelationLabel};

    #[test]
    fn inverse_swaps_parent_and_child_only() {
        assert_eq!(RelationLabel::Parent.inverse(), RelationLabel::Child);
        assert_eq!(RelationLabel::Child.inverse(), RelationLabel::Parent);
        assert_eq!(RelationLabel::Spouse.inverse(), RelationLabel::Spouse);
        assert_eq!(RelationLabel::Sibling.inverse(), RelationLabel::Sibling);
        assert_eq!(RelationLabel::Other.inverse(), RelationLabel::Other);
    }

    #[test]
    fn parse_lenient_maps_localized_and_unknown_labels() {
        assert_eq!(RelationLabel::parse_lenient(" Parent "), RelationLabel::Parent);
        assert_eq!(RelationLabel::parse_lenient("배우자"), RelationLabel::Spouse);
        assert_eq!(RelationLabel::parse_lenient("형제자매"), RelationLabel::Sibling);
        assert_eq!(RelationLabel::parse_lenient("godparent"), RelationLabel::Other);
        assert_eq!(RelationLabel::parse_lenient(""), RelationLabel::Other);
    }

    #[test]
    fn strict_parse_rejects_typos_but_accepts_known_labels() {
        assert_eq!(
            "prent".parse::<RelationLabel>(),
            Err(UnknownRelationLabel("prent".to_string()))
        );
        assert!("".parse::<RelationLabel>().is_err());
        assert_eq!("Spouse".parse::<RelationLabel>(), Ok(RelationLabel::Spouse));
        assert_eq!("자녀".parse::<RelationLabel>(), Ok(RelationLabel::Child));
        assert_eq!("기타".parse::<RelationLabel>(), Ok(RelationLabel::Other));

        let err = "cousin".parse::<RelationLabel>().unwrap_err();
        assert!(err.to_string().contains("parent|child|spouse|sibling|other"));
    }

    #[test]
    fn storage_form_roundtrips_through_lenient_parse() {
        for label in RelationLabel::DISPLAY_ORDER {
            assert_eq!(RelationLabel::parse_lenient(label.as_str()), label);
        }
    }
}
