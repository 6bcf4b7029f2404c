pub mod meta;
pub mod query;
pub mod upload;
