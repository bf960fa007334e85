//! Card renderer: configuration in, visual tree out.

/// Container, text-box and decoration sizing rules.
pub mod layout;
/// Theme decoration sprites.
pub mod sprites;
/// Visual tree description and the `render` entry point.
pub mod tree;
