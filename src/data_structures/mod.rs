//! Scene data: the node graph, transforms, materials and environment maps.
//!
//! - `instance` holds a node's local transform with its Euler rotation order
//! - `material` contains colors and material parameters the renderer reads
//! - `scene_graph` is the arena that owns nodes and materials
//! - `texture` holds decoded cube reflection maps

pub mod instance;
pub mod material;
pub mod scene_graph;
pub mod texture;
