use crate::{
    data_structures::scene_graph::SceneGraph,
    resources::animation::AnimationAction,
    vehicle::{Frame, Tick},
};

/// Doors eased between closed (0) and open (1).
///
/// The door animation never runs on its own clock: once opened the action's
/// time scale is zero, and every tick scrubs it to `state` as a fraction of
/// the clip's duration. That keeps the doors in lockstep with the intent flag
/// and lets them reverse mid-swing.
#[derive(Debug)]
pub struct DoorActuator {
    open_speed: f64,
    state: f64,
    need_open: bool,
    action: Option<AnimationAction>,
}

impl DoorActuator {
    pub fn new(open_speed: f64) -> Self {
        Self {
            open_speed,
            state: 0.0,
            need_open: false,
            action: None,
        }
    }

    /// Bind the door animation.
    ///
    /// When an open was already requested before the model finished loading,
    /// the action starts playing right away.
    pub fn set_action(&mut self, action: AnimationAction) {
        self.action = Some(action);
        if self.need_open {
            self.start_playback();
        }
    }

    fn start_playback(&mut self) {
        if let Some(action) = self.action.as_mut() {
            action.play();
            action.time_scale = 0.0;
        }
    }

    pub fn open(&mut self) {
        self.start_playback();
        self.need_open = true;
    }

    pub fn close(&mut self) {
        self.need_open = false;
    }

    pub fn toggle(&mut self) {
        if self.need_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn state(&self) -> f64 {
        self.state
    }

    pub fn need_open(&self) -> bool {
        self.need_open
    }

    pub fn action(&self) -> Option<&AnimationAction> {
        self.action.as_ref()
    }
}

impl Default for DoorActuator {
    fn default() -> Self {
        Self::new(0.02)
    }
}

impl Tick for DoorActuator {
    fn tick(&mut self, frame: &Frame, scene: &mut SceneGraph) {
        let step = if self.need_open {
            self.open_speed
        } else {
            -self.open_speed
        };
        self.state = (self.state + step).clamp(0.0, 1.0);

        if let Some(action) = self.action.as_mut() {
            let duration = action.clip().duration;
            action.set_time(self.state as f32 * duration);
            action.update(frame.dt, scene);
        }
    }
}
