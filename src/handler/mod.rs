//! Request handler module
//!
//! Route table dispatch and the snippet handlers.

pub mod router;
pub mod snippets;

// Re-export main entry point
pub use router::handle_request;
