//! Core types and controller wiring for the Trashify nearby-disposal-points client.

/// Category tag to pin appearance table.
pub mod appearance;
/// Suggesting a trash kind from an image classifier prediction.
pub mod classify;
/// State machine driving nearby-point queries for a presentation layer.
pub mod controller;
/// Domain models shared by the client and the presentation layer.
pub mod model;
/// Traits describing the collaborators the controller depends on.
pub mod ports;

pub use appearance::*;
pub use classify::*;
pub use controller::*;
pub use model::*;
pub use ports::*;
