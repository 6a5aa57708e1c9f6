pub mod account;
pub mod comments;
pub mod fields;
pub mod suggestions;
pub mod traffic;
