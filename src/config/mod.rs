//! Card configuration model and studio settings.

/// Card configuration value type and its enums.
pub mod model;
/// Process-level studio settings.
pub mod settings;
