//! Naming-convention classification of a freshly loaded vehicle model.

use std::sync::Arc;

use log::debug;

use crate::{
    data_structures::{
        instance::RotationOrder,
        scene_graph::{MaterialId, NodeId, SceneGraph},
        texture::EnvironmentMap,
    },
    resources::animation::{AnimationAction, AnimationClip},
};

pub const MAIN_MATERIAL: &str = "main_material";
pub const WHEEL_MATERIAL: &str = "wheel_material";

/// What a node does for the vehicle, judged by its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    FrontWheel,
    RearWheel,
    FrontLight,
    RearLight,
}

impl NodeRole {
    /// The first matching pattern wins; a name only needs to contain it.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.contains("wheel_fr") || name.contains("wheel_fl") {
            Some(Self::FrontWheel)
        } else if name.contains("wheel_rr") || name.contains("wheel_rl") {
            Some(Self::RearWheel)
        } else if name.contains("front_lights") {
            Some(Self::FrontLight)
        } else if name.contains("rear_lights") {
            Some(Self::RearLight)
        } else {
            None
        }
    }
}

/// Nodes and materials of a loaded model sorted by role.
#[derive(Debug, Default)]
pub struct ClassifiedSceneNodes {
    pub front_wheels: Vec<NodeId>,
    pub rear_wheels: Vec<NodeId>,
    pub front_lights: Vec<NodeId>,
    pub rear_lights: Vec<NodeId>,
    pub main_material: Option<MaterialId>,
    pub wheel_material: Option<MaterialId>,
    pub door_animation: Option<AnimationAction>,
}

impl ClassifiedSceneNodes {
    pub fn is_empty(&self) -> bool {
        self.front_wheels.is_empty()
            && self.rear_wheels.is_empty()
            && self.front_lights.is_empty()
            && self.rear_lights.is_empty()
            && self.main_material.is_none()
            && self.wheel_material.is_none()
            && self.door_animation.is_none()
    }
}

/// Walk `root` and everything below it, preparing the nodes for display and
/// sorting them by role.
///
/// Every node gets shadow casting and receiving enabled. Reflective materials
/// receive `env_map` and are flagged for a rebuild. The first clip, if any,
/// becomes the door animation.
pub fn classify(
    scene: &mut SceneGraph,
    root: NodeId,
    env_map: &Arc<EnvironmentMap>,
    clips: Vec<AnimationClip>,
) -> ClassifiedSceneNodes {
    let mut classified = ClassifiedSceneNodes::default();

    for id in scene.traverse(root) {
        let Some(node) = scene.node_mut(id) else {
            continue;
        };
        node.cast_shadow = true;
        node.receive_shadow = true;

        match NodeRole::from_name(&node.name) {
            Some(NodeRole::FrontWheel) => {
                // steering yaw first, then rolling pitch
                node.local.order = RotationOrder::Yxz;
                classified.front_wheels.push(id);
            }
            Some(NodeRole::RearWheel) => classified.rear_wheels.push(id),
            Some(NodeRole::FrontLight) => classified.front_lights.push(id),
            Some(NodeRole::RearLight) => classified.rear_lights.push(id),
            None => {}
        }

        let Some(material_id) = node.material else {
            continue;
        };
        let Some(material) = scene.material_mut(material_id) else {
            continue;
        };
        if !material.accepts_env_map() {
            continue;
        }
        material.env_map = Some(Arc::clone(env_map));
        material.needs_update = true;
        match material.name.as_str() {
            MAIN_MATERIAL => classified.main_material = Some(material_id),
            WHEEL_MATERIAL => classified.wheel_material = Some(material_id),
            _ => {}
        }
    }

    if let Some(clip) = clips.into_iter().next() {
        debug!("Using animation `{}` for the doors", clip.name);
        classified.door_animation = Some(AnimationAction::new(clip));
    }

    debug!(
        "Classified {} front / {} rear wheels, {} front / {} rear lights",
        classified.front_wheels.len(),
        classified.rear_wheels.len(),
        classified.front_lights.len(),
        classified.rear_lights.len()
    );
    classified
}
