use std::{path::PathBuf, sync::Arc};

use car_configurator::{
    config::{AssetConfig, Config},
    data_structures::{
        instance::Instance,
        material::{Material, MaterialKind},
        scene_graph::{NodeId, SceneGraph, SceneNode},
        texture::EnvironmentMap,
    },
    resources::animation::{AnimationChannel, AnimationClip, Keyframes},
};
use cgmath::{Quaternion, Rad, Rotation3, Vector3};
use image::{Rgb, RgbImage};

pub const EPSILON: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Directory holding the glTF car and its environment map.
pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/assets")
}

pub fn fixture_assets() -> AssetConfig {
    AssetConfig {
        asset_dir: fixture_dir(),
        model: "models/car.gltf".to_string(),
        env_map_dir: "env".to_string(),
        env_map_faces: ["posx", "negx", "posy", "negy", "posz", "negz"]
            .map(|face| format!("{face}.png")),
    }
}

/// Fast frames, no status lines and a bounded run.
pub fn fixture_config(max_frames: u64) -> Config {
    let mut config = Config::default();
    config.assets = fixture_assets();
    config.frame.frame_rate = 500.0;
    config.frame.max_frames = Some(max_frames);
    config.frame.status_every = 0;
    config
}

pub fn env_map() -> Arc<EnvironmentMap> {
    let face = RgbImage::from_pixel(2, 2, Rgb([90, 90, 90]));
    Arc::new(
        EnvironmentMap::from_faces(std::array::from_fn(|_| face.clone()))
            .expect("uniform faces are valid"),
    )
}

/// Handles of the parts in [`SyntheticCar`].
pub struct SyntheticCar {
    pub scene: SceneGraph,
    pub body: NodeId,
    pub door: NodeId,
    pub front_wheels: [NodeId; 2],
    pub rear_wheels: [NodeId; 2],
    pub front_lights: NodeId,
    pub rear_lights: NodeId,
    pub clips: Vec<AnimationClip>,
}

/// A car assembled in code with the same naming as an exported model: four
/// wheels, two light groups, a painted body and one door animation of 2s.
pub fn synthetic_car() -> SyntheticCar {
    let mut scene = SceneGraph::new();
    let paint = scene.add_material(Material::new("main_material", MaterialKind::Standard));
    let rims = scene.add_material(Material::new("wheel_material", MaterialKind::Standard));
    let head = scene.add_material(Material::new("headlight", MaterialKind::Standard));
    let tail = scene.add_material(Material::new("taillight", MaterialKind::Standard));
    let glass = scene.add_material(Material::new("glass", MaterialKind::Basic));

    let car = scene.add_node(SceneGraph::ROOT, SceneNode::new("car"));
    let body = scene.add_node(car, SceneNode::new("body").with_material(paint));
    scene.add_node(body, SceneNode::new("windshield").with_material(glass));
    let door = scene.add_node(
        body,
        SceneNode::new("door_left")
            .with_material(paint)
            .with_transform(Instance::from(Vector3::new(0.9, 0.5, 0.2))),
    );
    let wheel = |scene: &mut SceneGraph, name: &str, x: f32, z: f32| {
        scene.add_node(
            car,
            SceneNode::new(name)
                .with_material(rims)
                .with_transform(Instance::from(Vector3::new(x, 0.3, z))),
        )
    };
    let front_wheels = [
        wheel(&mut scene, "wheel_fl", 0.8, 1.3),
        wheel(&mut scene, "wheel_fr", -0.8, 1.3),
    ];
    let rear_wheels = [
        wheel(&mut scene, "wheel_rl", 0.8, -1.3),
        wheel(&mut scene, "wheel_rr", -0.8, -1.3),
    ];
    let front_lights = scene.add_node(car, SceneNode::new("front_lights").with_material(head));
    let rear_lights = scene.add_node(car, SceneNode::new("rear_lights").with_material(tail));

    let clips = vec![AnimationClip::new(
        "doors",
        vec![AnimationChannel {
            target: door,
            keyframes: Keyframes::Rotation(vec![
                Quaternion::from_angle_y(Rad(0.0)),
                Quaternion::from_angle_y(Rad(1.0)),
            ]),
            timestamps: vec![0.0, 2.0],
        }],
    )];

    SyntheticCar {
        scene,
        body,
        door,
        front_wheels,
        rear_wheels,
        front_lights,
        rear_lights,
        clips,
    }
}
