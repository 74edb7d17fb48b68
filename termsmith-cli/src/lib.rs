// All core functionality is in termsmith-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod logging;

// Re-export core types for convenience
pub use termsmith_core::*;

// Re-export CLI utilities
pub use logging::{init_tracing, LoggingConfig};
