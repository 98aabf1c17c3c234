use crate::{
    config::VehicleConfig,
    data_structures::scene_graph::{NodeId, SceneGraph},
    vehicle::{Frame, Tick},
};

/// Head and tail lights, eased on and off by a fixed step per frame.
///
/// Headlights glow white, so all three emissive channels follow the
/// brightness. Tail lights only drive the red channel; green and blue keep
/// whatever the model authored.
#[derive(Debug)]
pub struct LightRig {
    turned_on: bool,
    reaction: f64,
    max_brightness: f64,
    brightness: f64,
    front: Vec<NodeId>,
    rear: Vec<NodeId>,
}

impl LightRig {
    pub fn new(reaction: f64, max_brightness: f64) -> Self {
        Self {
            turned_on: false,
            reaction,
            max_brightness,
            brightness: 0.0,
            front: Vec::new(),
            rear: Vec::new(),
        }
    }

    pub fn from_config(config: &VehicleConfig) -> Self {
        Self::new(config.light_reaction, config.max_brightness)
    }

    pub fn attach(&mut self, front: Vec<NodeId>, rear: Vec<NodeId>) {
        self.front = front;
        self.rear = rear;
    }

    pub fn turn(&mut self, on: bool) {
        self.turned_on = on;
    }

    pub fn toggle(&mut self) {
        self.turned_on = !self.turned_on;
    }

    pub fn is_on(&self) -> bool {
        self.turned_on
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn max_brightness(&self) -> f64 {
        self.max_brightness
    }

    pub fn front(&self) -> &[NodeId] {
        &self.front
    }

    pub fn rear(&self) -> &[NodeId] {
        &self.rear
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::from_config(&VehicleConfig::default())
    }
}

impl Tick for LightRig {
    fn tick(&mut self, _: &Frame, scene: &mut SceneGraph) {
        let step = if self.turned_on {
            self.reaction
        } else {
            -self.reaction
        };
        self.brightness = (self.brightness + step).clamp(0.0, self.max_brightness);

        let b = self.brightness as f32;
        for id in &self.front {
            if let Some(material) = scene.node_material_mut(*id) {
                material.emissive.set_rgb(b, b, b);
            }
        }
        for id in &self.rear {
            if let Some(material) = scene.node_material_mut(*id) {
                material.emissive.r = b;
            }
        }
    }
}
