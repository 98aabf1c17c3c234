//! The showroom: one car in a scene, driven by the frame loop.

use std::sync::Arc;

use instant::Duration;
use log::{error, info, warn};

use crate::{
    command::Command,
    config::AssetConfig,
    context::Context,
    data_structures::{scene_graph::SceneGraph, texture::EnvironmentMap},
    error::Error,
    flow::{Continuation, FutContinuation, GraphicsFlow, Out},
    resources::{LoadedVehicle, load_vehicle},
    vehicle::{VehicleState, classify},
};

/// Application state: the scene and the vehicle living in it.
#[derive(Debug, Default)]
pub struct Showroom {
    pub scene: SceneGraph,
    pub vehicle: VehicleState,
    /// Reflection map, kept for later loads once resolved.
    pub env_map: Option<Arc<EnvironmentMap>>,
    loaded: bool,
}

impl Showroom {
    pub fn new(vehicle: VehicleState) -> Self {
        Self {
            vehicle,
            ..Default::default()
        }
    }

    /// Whether a vehicle model has been classified into the scene.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Graft a loaded vehicle under the scene root, classify it and hand the
    /// result to the vehicle.
    pub fn install(&mut self, loaded: LoadedVehicle) {
        let LoadedVehicle { model, env_map } = loaded;
        let mapping = self.scene.graft(model.scene, SceneGraph::ROOT);
        let clips = model
            .clips
            .into_iter()
            .map(|clip| clip.retarget(&mapping))
            .collect();
        let classified = classify(&mut self.scene, SceneGraph::ROOT, &env_map, clips);
        self.vehicle.attach(classified);
        self.env_map = Some(env_map);
        self.loaded = true;
    }

    /// Apply the outcome of a load. Failures are logged and leave the vehicle
    /// unclassified for the rest of the session.
    pub fn finish_load(&mut self, result: Result<LoadedVehicle, Error>) {
        match result {
            Ok(loaded) => {
                self.install(loaded);
                info!("Vehicle ready: {}", self.vehicle.status());
            }
            Err(e) => error!("{e:#}"),
        }
    }

    /// One frame: advance the vehicle, then refresh world transforms for the renderer.
    pub fn update(&mut self, dt: Duration) {
        self.vehicle.tick(dt.as_secs_f32(), &mut self.scene);
        self.scene.update_world_transforms();
    }

    pub fn apply(&mut self, command: Command) -> Result<(), Error> {
        match command {
            Command::ToggleLights => self.vehicle.toggle_lights(),
            Command::Lights(on) => self.vehicle.turn(on),
            Command::ToggleDoors => self.vehicle.toggle_doors(),
            Command::OpenDoors => self.vehicle.open(),
            Command::CloseDoors => self.vehicle.close(),
            Command::Speed(value) => self.vehicle.set_speed(value),
            Command::Steer(value) => self.vehicle.set_steer(value),
            Command::MainColor(style) => self.vehicle.set_main_color(&mut self.scene, &style)?,
            Command::WheelColor(style) => self.vehicle.set_wheel_color(&mut self.scene, &style)?,
            Command::Status => info!("{}", self.vehicle.status()),
            Command::Quit => {}
        }
        Ok(())
    }
}

/// Start loading the vehicle. The returned future never fails; its
/// continuation either installs the model or logs why it could not.
pub fn load_into_showroom(
    assets: AssetConfig,
    cached_env_map: Option<Arc<EnvironmentMap>>,
) -> FutContinuation<Showroom> {
    Box::pin(async move {
        let result = load_vehicle(&assets, cached_env_map).await;
        Box::new(move |showroom: &mut Showroom| showroom.finish_load(result))
            as Continuation<Showroom>
    })
}

/// Drives a [`Showroom`]: loads the vehicle at startup, ticks it every frame
/// and forwards commands.
#[derive(Debug, Default)]
pub struct ShowroomFlow;

impl GraphicsFlow<Showroom, Command> for ShowroomFlow {
    fn on_init(&mut self, ctx: &mut Context, state: &mut Showroom) -> Out<Showroom> {
        info!(
            "Loading {} from {}",
            ctx.config.assets.model,
            ctx.config.assets.asset_dir.display()
        );
        Out::FutFn(vec![load_into_showroom(
            ctx.config.assets.clone(),
            state.env_map.clone(),
        )])
    }

    fn on_update(&mut self, ctx: &Context, state: &mut Showroom, dt: Duration) -> Out<Showroom> {
        state.update(dt);
        let every = ctx.config.frame.status_every;
        if every > 0 && ctx.frame() % every == 0 {
            info!("frame {}: {}", ctx.frame(), state.vehicle.status());
        }
        Out::Empty
    }

    fn on_command(&mut self, _: &Context, state: &mut Showroom, command: Command) -> Out<Showroom> {
        if command == Command::Quit {
            return Out::Exit;
        }
        if let Err(e) = state.apply(command) {
            warn!("{e}");
        }
        Out::Empty
    }
}
