mod activity;
mod comment;
mod field;
mod suggestion;
mod traffic_level;
mod traffic_report;

pub use activity::{FieldContribution, UserStats};
pub use comment::FieldComment;
pub use field::{Coordinates, Field};
pub use suggestion::{FieldSuggestion, SuggestionStatus};
pub use traffic_level::{ConsensusLevel, MarkerColor, ReportLevel, TrafficLevel};
pub use traffic_report::TrafficReport;
