use std::f64::consts::TAU;

use crate::{
    data_structures::scene_graph::{NodeId, SceneGraph},
    vehicle::{Frame, Tick},
};

/// Rolling and steering of the wheel nodes.
///
/// Every wheel advances a shared rotation accumulator by `speed` before taking
/// its value as roll, so with four wheels the accumulator moves four steps per
/// frame and the wheels are slightly out of phase with each other.
#[derive(Debug, Default)]
pub struct WheelAssembly {
    front: Vec<NodeId>,
    rear: Vec<NodeId>,
    rotation: f64,
}

impl WheelAssembly {
    pub fn attach(&mut self, front: Vec<NodeId>, rear: Vec<NodeId>) {
        self.front = front;
        self.rear = rear;
    }

    pub fn front(&self) -> &[NodeId] {
        &self.front
    }

    pub fn rear(&self) -> &[NodeId] {
        &self.rear
    }

    /// Current accumulator value in radians, kept within (-2π, 2π).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

impl Tick for WheelAssembly {
    fn tick(&mut self, frame: &Frame, scene: &mut SceneGraph) {
        for id in &self.front {
            if let Some(node) = scene.node_mut(*id) {
                node.local.rotation.y = -frame.steer as f32;
            }
        }
        for id in self.front.iter().chain(self.rear.iter()) {
            self.rotation = (self.rotation - frame.speed) % TAU;
            if let Some(node) = scene.node_mut(*id) {
                node.local.rotation.x = self.rotation as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::scene_graph::SceneNode;

    fn frame(speed: f64, steer: f64) -> Frame {
        Frame {
            speed,
            steer,
            dt: 0.016,
        }
    }

    #[test]
    fn front_wheels_steer_rear_wheels_do_not() {
        let mut scene = SceneGraph::new();
        let front = scene.add_node(SceneGraph::ROOT, SceneNode::new("wheel_fl"));
        let rear = scene.add_node(SceneGraph::ROOT, SceneNode::new("wheel_rl"));
        let mut wheels = WheelAssembly::default();
        wheels.attach(vec![front], vec![rear]);

        wheels.tick(&frame(0.2, 0.5), &mut scene);
        assert!((scene.node(front).unwrap().local.rotation.y + 0.5).abs() < 1e-6);
        assert_eq!(scene.node(rear).unwrap().local.rotation.y, 0.0);
    }

    #[test]
    fn each_wheel_advances_the_accumulator() {
        let mut scene = SceneGraph::new();
        let front = scene.add_node(SceneGraph::ROOT, SceneNode::new("wheel_fr"));
        let rear = scene.add_node(SceneGraph::ROOT, SceneNode::new("wheel_rr"));
        let mut wheels = WheelAssembly::default();
        wheels.attach(vec![front], vec![rear]);

        wheels.tick(&frame(0.2, 0.0), &mut scene);
        assert!((scene.node(front).unwrap().local.rotation.x + 0.2).abs() < 1e-6);
        assert!((scene.node(rear).unwrap().local.rotation.x + 0.4).abs() < 1e-6);
        assert!((wheels.rotation() + 0.4).abs() < 1e-12);
    }

    #[test]
    fn accumulator_stays_bounded_over_long_sessions() {
        let mut scene = SceneGraph::new();
        let wheel = scene.add_node(SceneGraph::ROOT, SceneNode::new("wheel_rl"));
        let mut wheels = WheelAssembly::default();
        wheels.attach(vec![], vec![wheel]);
        for _ in 0..1_000_000 {
            wheels.tick(&frame(0.2, 0.0), &mut scene);
        }
        assert!(wheels.rotation().abs() < TAU);
        // 200_000 rad modulo 2π
        let expected = -(200_000.0_f64 % TAU);
        assert!((wheels.rotation() - expected).abs() < 1e-6);
    }

    #[test]
    fn no_wheels_is_a_no_op() {
        let mut scene = SceneGraph::new();
        let mut wheels = WheelAssembly::default();
        wheels.tick(&frame(0.2, 1.0), &mut scene);
        assert_eq!(wheels.rotation(), 0.0);
    }
}
