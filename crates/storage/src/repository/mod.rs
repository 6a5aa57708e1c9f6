pub mod activity;
pub mod comment;
pub mod field;
pub mod suggestion;
pub mod traffic_report;
