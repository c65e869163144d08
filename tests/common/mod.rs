//! Common test utilities for mapshade.

// Re-export all common test utilities
pub mod test_data;
