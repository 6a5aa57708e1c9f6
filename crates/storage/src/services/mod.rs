pub mod comment_category;
pub mod consensus;
pub mod geo;
pub mod traffic;
