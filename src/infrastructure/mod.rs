pub mod bucket;
pub mod observability;
pub mod persistence;
pub mod queue;
