pub mod attendance;
pub mod location;
pub mod role;

mod macros;

// Re-export all models for easy importing
pub use attendance::*;
pub use location::*;
pub use role::*;
