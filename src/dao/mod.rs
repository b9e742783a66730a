/// In-memory store for workflow records.
pub mod store;
