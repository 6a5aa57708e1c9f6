use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommentCategory {
    Conditions,
    Players,
    Facilities,
    Parking,
    Safety,
    #[default]
    General,
}

impl CommentCategory {
    pub const ALL: [CommentCategory; 6] = [
        Self::Conditions,
        Self::Players,
        Self::Facilities,
        Self::Parking,
        Self::Safety,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conditions => "conditions",
            Self::Players => "players",
            Self::Facilities => "facilities",
            Self::Parking => "parking",
            Self::Safety => "safety",
            Self::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Conditions => "Field Conditions",
            Self::Players => "Players & Games",
            Self::Facilities => "Facilities",
            Self::Parking => "Parking",
            Self::Safety => "Safety",
            Self::General => "General",
        }
    }
}

impl fmt::Display for CommentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("Unknown comment category: '{}'", s))
    }
}

/// Keyword rules, evaluated top to bottom; the first hit wins.
const RULES: &[(CommentCategory, &[&str])] = &[
    (CommentCategory::Conditions, &["mud", "grass", "turf", "condition"]),
    (CommentCategory::Players, &["game", "player", "team", "match"]),
    (CommentCategory::Facilities, &["bathroom", "toilet", "water", "bench"]),
    (CommentCategory::Parking, &["park", "car", "lot"]),
    (CommentCategory::Safety, &["safe", "light", "danger", "secure"]),
];

/// Buckets free text by case-insensitive substring match.
pub fn classify(text: &str) -> CommentCategory {
    let text = text.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(CommentCategory::General)
}

/// An explicit choice is kept; `General` asks for auto-detection.
pub fn resolve_category(selected: CommentCategory, text: &str) -> CommentCategory {
    match selected {
        CommentCategory::General => classify(text),
        explicit => explicit,
    }
}
