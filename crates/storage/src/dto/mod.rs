pub mod account;
pub mod comment;
pub mod common;
pub mod field;
pub mod suggestion;
pub mod traffic;
