// Domain-specific error types
pub mod errors;

// Event shapes and JSON helpers
pub mod events;

// Port interfaces
pub mod ports;
