//! The per-frame vehicle model.
//!
//! [`VehicleState`] owns three actuators (wheels, lights, doors) that each
//! advance by a fixed step per [`Tick::tick`] call. The steps are per frame,
//! not per second: doubling the frame rate doubles how fast the doors swing.
//! The actuators only hold handles into the [`SceneGraph`]; until a model is
//! classified and attached their handle lists are empty and ticking them only
//! moves the scalars.

use std::fmt;

use log::debug;

use crate::{
    config::VehicleConfig,
    data_structures::scene_graph::{MaterialId, SceneGraph},
    error::Result,
};

pub mod classify;
pub mod doors;
pub mod lights;
pub mod wheels;

pub use classify::{ClassifiedSceneNodes, NodeRole, classify};
pub use doors::DoorActuator;
pub use lights::LightRig;
pub use wheels::WheelAssembly;

/// Inputs shared by all actuators for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub speed: f64,
    pub steer: f64,
    /// Seconds since the previous frame; only the animation clock reads it.
    pub dt: f32,
}

/// Something advanced once per rendered frame.
pub trait Tick {
    fn tick(&mut self, frame: &Frame, scene: &mut SceneGraph);
}

#[derive(Debug)]
pub struct VehicleState {
    pub speed: f64,
    pub steer: f64,
    main_material: Option<MaterialId>,
    wheel_material: Option<MaterialId>,
    wheels: WheelAssembly,
    lights: LightRig,
    doors: DoorActuator,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new(&VehicleConfig::default())
    }
}

impl VehicleState {
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            speed: config.speed,
            steer: config.steer,
            main_material: None,
            wheel_material: None,
            wheels: WheelAssembly::default(),
            lights: LightRig::from_config(config),
            doors: DoorActuator::new(config.door_open_speed),
        }
    }

    /// Hand the classified nodes of a loaded model to the actuators.
    pub fn attach(&mut self, classified: ClassifiedSceneNodes) {
        self.wheels
            .attach(classified.front_wheels, classified.rear_wheels);
        self.lights
            .attach(classified.front_lights, classified.rear_lights);
        self.main_material = classified.main_material;
        self.wheel_material = classified.wheel_material;
        if let Some(action) = classified.door_animation {
            self.doors.set_action(action);
        }
    }

    /// Advance wheels, lights and doors by one frame, in that order.
    pub fn tick(&mut self, dt: f32, scene: &mut SceneGraph) {
        let frame = Frame {
            speed: self.speed,
            steer: self.steer,
            dt,
        };
        self.wheels.tick(&frame, scene);
        self.lights.tick(&frame, scene);
        self.doors.tick(&frame, scene);
    }

    pub fn open(&mut self) {
        self.doors.open();
    }

    pub fn close(&mut self) {
        self.doors.close();
    }

    pub fn toggle_doors(&mut self) {
        self.doors.toggle();
    }

    pub fn turn(&mut self, on: bool) {
        self.lights.turn(on);
    }

    pub fn toggle_lights(&mut self) {
        self.lights.toggle();
    }

    /// Map a speed control value (0..100) through a fourth-root curve, so the
    /// lower half of the control gives fine-grained slow speeds.
    pub fn set_speed(&mut self, value: f64) {
        self.speed = value.max(0.0).powf(0.25) / 100.0;
    }

    /// Map a steering control value (-100..100) linearly.
    pub fn set_steer(&mut self, value: f64) {
        self.steer = value / 100.0;
    }

    /// Repaint the body. Ignored until the body material is known.
    pub fn set_main_color(&mut self, scene: &mut SceneGraph, style: &str) -> Result<()> {
        paint(scene, self.main_material, style)
    }

    /// Repaint the rims. Ignored until the wheel material is known.
    pub fn set_wheel_color(&mut self, scene: &mut SceneGraph, style: &str) -> Result<()> {
        paint(scene, self.wheel_material, style)
    }

    pub fn wheels(&self) -> &WheelAssembly {
        &self.wheels
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn doors(&self) -> &DoorActuator {
        &self.doors
    }

    pub fn main_material(&self) -> Option<MaterialId> {
        self.main_material
    }

    pub fn wheel_material(&self) -> Option<MaterialId> {
        self.wheel_material
    }

    pub fn status(&self) -> VehicleStatus {
        VehicleStatus {
            speed: self.speed,
            steer: self.steer,
            lights_on: self.lights.is_on(),
            brightness: self.lights.brightness(),
            doors_requested_open: self.doors.need_open(),
            door_state: self.doors.state(),
            wheels: self.wheels.front().len() + self.wheels.rear().len(),
            lights: self.lights.front().len() + self.lights.rear().len(),
        }
    }
}

fn paint(scene: &mut SceneGraph, material: Option<MaterialId>, style: &str) -> Result<()> {
    match material.and_then(|id| scene.material_mut(id)) {
        Some(material) => material.color.set_style(style),
        None => {
            debug!("Ignoring color {style}: material not loaded yet");
            Ok(())
        }
    }
}

/// Snapshot of the vehicle for status output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleStatus {
    pub speed: f64,
    pub steer: f64,
    pub lights_on: bool,
    pub brightness: f64,
    pub doors_requested_open: bool,
    pub door_state: f64,
    pub wheels: usize,
    pub lights: usize,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "speed {:.4} steer {:+.2} | lights {} ({:.2}) | doors {} ({:.2}) | {} wheels, {} lights attached",
            self.speed,
            self.steer,
            if self.lights_on { "on" } else { "off" },
            self.brightness,
            if self.doors_requested_open { "opening" } else { "closing" },
            self.door_state,
            self.wheels,
            self.lights,
        )
    }
}
