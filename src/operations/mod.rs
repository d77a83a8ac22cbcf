pub mod creation;
pub mod fix;
pub mod query;
