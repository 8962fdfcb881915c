//! Hardware abstraction traits
//!
//! These traits define the interface between the monitor loop and the
//! board-specific sampler and display implementations.

pub mod display;
pub mod sampler;

pub use display::{CharacterDisplay, DisplayError, DisplayExt};
pub use sampler::Sampler;
