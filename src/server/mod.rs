// Server module entry
// Listener creation and per-connection serving

pub mod connection;
pub mod listener;

// Re-export commonly used functions
pub use connection::accept_connection;
pub use listener::create_listener;
