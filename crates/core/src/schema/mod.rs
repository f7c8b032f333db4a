pub mod decimal;
pub mod patch;
pub mod store;
pub mod timestamp;
pub mod validate;
