//! car-configurator
//!
//! An interactive car configurator. A glTF vehicle is loaded into a scene
//! graph, its parts are classified by name (wheels, lights, paint) and a small
//! per-frame state model spins the wheels, fades the lights and swings the
//! doors. User commands repaint the car and change its controls between
//! frames. Rendering is left to the embedding application, which reads the
//! world transforms and materials from the scene after every frame.
//!
//! High-level modules
//! - `app`: the showroom state and the flow that drives it
//! - `command`: textual user commands
//! - `config`: tuning, asset locations and frame loop settings
//! - `context`: frame bookkeeping passed to every flow hook
//! - `data_structures`: scene graph, transforms, materials and environment maps
//! - `error`: error type shared by the library
//! - `flow`: flow control and the frame loop
//! - `resources`: glTF, animation and environment map loading
//! - `vehicle`: wheels, lights and doors advanced once per frame
//!

pub mod app;
pub mod command;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod resources;
pub mod vehicle;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use error::{Error, Result};
