pub mod condition;
pub mod engine;
pub mod error;
pub mod sql;
pub mod store;
pub mod table;
pub mod types;
