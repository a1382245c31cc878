// Storage queries (human or JSON output)
pub mod query;

// Method-channel bridge
pub mod bridge;
