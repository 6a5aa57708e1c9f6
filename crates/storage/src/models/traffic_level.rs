use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical crowd level a user can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrafficLevel {
    type Err = String;

    /// Accepts the canonical labels and the legacy `light`/`moderate`/`crowded` ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "light" => Ok(Self::Low),
            "medium" | "moderate" => Ok(Self::Medium),
            "high" | "crowded" => Ok(Self::High),
            other => Err(format!("Unknown traffic level: '{}'", other)),
        }
    }
}

/// The level carried by a stored report, which may predate validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    Known(TrafficLevel),
    Other(String),
}

impl ReportLevel {
    pub fn parse(raw: &str) -> Self {
        raw.parse::<TrafficLevel>()
            .map(Self::Known)
            .unwrap_or_else(|_| Self::Other(raw.to_string()))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

/// Displayed outcome of aggregating reports.
///
/// Every malformed label collapses into the single `Other` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLevel {
    Low,
    Medium,
    High,
    Other,
    Unknown,
}

impl ConsensusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }

    pub fn marker_color(&self) -> MarkerColor {
        match self {
            Self::Low => MarkerColor::Green,
            Self::Medium => MarkerColor::Yellow,
            Self::High => MarkerColor::Red,
            Self::Other | Self::Unknown => MarkerColor::Gray,
        }
    }

    /// Reads back a level previously written with `as_str`, e.g. the
    /// denormalized `current_traffic` column.
    pub fn parse(value: &str) -> Self {
        match ReportLevel::parse(value) {
            ReportLevel::Known(level) => level.into(),
            ReportLevel::Other(raw) if raw.trim().eq_ignore_ascii_case("unknown") => Self::Unknown,
            ReportLevel::Other(_) => Self::Other,
        }
    }
}

impl From<TrafficLevel> for ConsensusLevel {
    fn from(level: TrafficLevel) -> Self {
        match level {
            TrafficLevel::Low => Self::Low,
            TrafficLevel::Medium => Self::Medium,
            TrafficLevel::High => Self::High,
        }
    }
}

impl From<&ReportLevel> for ConsensusLevel {
    fn from(level: &ReportLevel) -> Self {
        match level {
            ReportLevel::Known(level) => (*level).into(),
            ReportLevel::Other(_) => Self::Other,
        }
    }
}

impl fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual encoding shared by list badges, the detail headline and map markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Yellow,
    Red,
    Gray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_level_parsing() {
        assert_eq!("low".parse::<TrafficLevel>(), Ok(TrafficLevel::Low));
        assert_eq!(" HIGH ".parse::<TrafficLevel>(), Ok(TrafficLevel::High));
        assert_eq!("Medium".parse::<TrafficLevel>(), Ok(TrafficLevel::Medium));
        assert!("packed".parse::<TrafficLevel>().is_err());
        assert!("".parse::<TrafficLevel>().is_err());
    }

    #[test]
    fn test_legacy_labels_normalize() {
        assert_eq!("light".parse::<TrafficLevel>(), Ok(TrafficLevel::Low));
        assert_eq!("moderate".parse::<TrafficLevel>(), Ok(TrafficLevel::Medium));
        assert_eq!("Crowded".parse::<TrafficLevel>(), Ok(TrafficLevel::High));
    }

    #[test]
    fn test_report_level_keeps_malformed_value() {
        assert_eq!(ReportLevel::parse("light"), ReportLevel::Known(TrafficLevel::Low));

        let level = ReportLevel::parse("packed");
        assert!(level.is_malformed());
        assert_eq!(level, ReportLevel::Other("packed".to_string()));
        assert_eq!(ConsensusLevel::from(&level), ConsensusLevel::Other);
    }

    #[test]
    fn test_marker_colors() {
        assert_eq!(ConsensusLevel::Low.marker_color(), MarkerColor::Green);
        assert_eq!(ConsensusLevel::Medium.marker_color(), MarkerColor::Yellow);
        assert_eq!(ConsensusLevel::High.marker_color(), MarkerColor::Red);
        assert_eq!(ConsensusLevel::Other.marker_color(), MarkerColor::Gray);
        assert_eq!(ConsensusLevel::Unknown.marker_color(), MarkerColor::Gray);
    }

    #[test]
    fn test_consensus_level_round_trips_cache_column() {
        assert_eq!(ConsensusLevel::parse("unknown"), ConsensusLevel::Unknown);
        assert_eq!(ConsensusLevel::parse("moderate"), ConsensusLevel::Medium);
        assert_eq!(ConsensusLevel::parse("other"), ConsensusLevel::Other);
        assert_eq!(
            ConsensusLevel::parse(ConsensusLevel::High.as_str()),
            ConsensusLevel::High
        );
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(
            serde_json::to_string(&ConsensusLevel::Unknown).unwrap(),
            "\"unknown\""
        );
        assert_eq!(serde_json::to_string(&MarkerColor::Gray).unwrap(), "\"gray\"");
    }
}
