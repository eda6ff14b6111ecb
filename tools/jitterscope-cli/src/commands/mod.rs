pub mod score;
pub mod summary;
pub mod tune;
