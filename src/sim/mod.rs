pub mod comfort;
pub mod engine;
pub mod field;
pub mod solar;
