use std::{f32::consts::FRAC_PI_3, sync::Arc};

use car_configurator::{
    app::Showroom,
    command::Command,
    data_structures::{instance::RotationOrder, material::Color, scene_graph::SceneGraph},
    error::Error,
    resources::{load_model_gltf, load_vehicle},
};

use crate::common::test_utils::{fixture_assets, fixture_dir};

mod common;

#[tokio::test]
async fn gltf_fixture_converts_into_a_scene() {
    let model = load_model_gltf(&fixture_dir(), "models/car.gltf").await.unwrap();
    let scene = &model.scene;
    assert_eq!(scene.len(), 10);

    let car = scene.find_by_name("car").unwrap();
    assert_eq!(scene.node(car).unwrap().parent, Some(SceneGraph::ROOT));
    let door = scene.find_by_name("door_left").unwrap();
    let body = scene.find_by_name("body").unwrap();
    assert_eq!(scene.node(door).unwrap().parent, Some(body));

    let wheel = scene.node(scene.find_by_name("wheel_fl").unwrap()).unwrap();
    assert_eq!(wheel.local.position, cgmath::Vector3::new(0.8, 0.3, 1.3));
    let rims = scene.material(wheel.material.unwrap()).unwrap();
    assert_eq!(rims.name, "wheel_material");
    let paint = scene.material(scene.node(body).unwrap().material.unwrap()).unwrap();
    assert_eq!(paint.name, "main_material");
    assert_eq!(paint.color, Color::new(0.8, 0.1, 0.1));

    assert_eq!(model.clips.len(), 1);
    let clip = &model.clips[0];
    assert_eq!(clip.name, "doors");
    assert_eq!(clip.duration, 1.0);
    assert_eq!(clip.channels.len(), 1);
    assert_eq!(clip.channels[0].target, door);
}

#[tokio::test]
async fn multi_material_meshes_split_into_one_node_per_primitive() {
    let model = load_model_gltf(&fixture_dir(), "models/two_tone.gltf").await.unwrap();
    let scene = &model.scene;
    assert_eq!(scene.len(), 6);

    let body = scene.find_by_name("body").unwrap();
    let body_node = scene.node(body).unwrap();
    assert!(body_node.material.is_none());
    let parts: Vec<_> = body_node
        .children
        .iter()
        .map(|id| scene.node(*id).unwrap())
        .collect();
    let names: Vec<_> = parts.iter().map(|part| part.name.as_str()).collect();
    assert_eq!(names, ["body_shell_0", "body_shell_1"]);
    let materials: Vec<_> = parts
        .iter()
        .map(|part| scene.material(part.material.unwrap()).unwrap().name.as_str())
        .collect();
    assert_eq!(materials, ["glass", "main_material"]);

    // a single primitive without a material stays a plain node
    let wheel = scene.node(scene.find_by_name("wheel_fl").unwrap()).unwrap();
    assert!(wheel.material.is_none() && wheel.children.is_empty());
}

#[tokio::test]
async fn paint_on_a_later_primitive_is_still_found() {
    let mut assets = fixture_assets();
    assets.model = "models/two_tone.gltf".to_string();
    let mut showroom = Showroom::default();
    showroom.install(load_vehicle(&assets, None).await.unwrap());

    let paint = showroom.vehicle.main_material().unwrap();
    assert!(showroom.scene.material(paint).unwrap().env_map.is_some());
    showroom.apply(Command::MainColor("#00ff00".to_string())).unwrap();
    assert_eq!(showroom.scene.material(paint).unwrap().color, Color::new(0.0, 1.0, 0.0));
    assert_eq!(showroom.vehicle.wheels().front().len(), 1);
}

#[tokio::test]
async fn installed_vehicle_is_classified() {
    let loaded = load_vehicle(&fixture_assets(), None).await.unwrap();
    assert_eq!(loaded.env_map.size(), 2);

    let mut showroom = Showroom::default();
    showroom.install(loaded);
    assert!(showroom.is_loaded());
    let status = showroom.vehicle.status();
    assert_eq!(status.wheels, 4);
    assert_eq!(status.lights, 2);

    let scene = &showroom.scene;
    for id in showroom.vehicle.wheels().front() {
        let node = scene.node(*id).unwrap();
        assert!(node.name.starts_with("wheel_f"));
        assert_eq!(node.local.order, RotationOrder::Yxz);
    }
    let paint = scene.material(showroom.vehicle.main_material().unwrap()).unwrap();
    let env_map = showroom.env_map.as_ref().unwrap();
    assert!(Arc::ptr_eq(paint.env_map.as_ref().unwrap(), env_map));
    assert!(paint.needs_update);
    assert!(showroom.vehicle.wheel_material().is_some());
    assert!(showroom.vehicle.doors().action().is_some());
}

#[tokio::test]
async fn doors_follow_the_exported_animation() {
    let mut showroom = Showroom::default();
    showroom.install(load_vehicle(&fixture_assets(), None).await.unwrap());
    let door = showroom.scene.find_by_name("door_left").unwrap();

    showroom.apply(Command::OpenDoors).unwrap();
    for _ in 0..50 {
        showroom.update(instant::Duration::from_millis(16));
    }
    assert_eq!(showroom.vehicle.doors().state(), 1.0);
    let node = showroom.scene.node(door).unwrap();
    assert!((node.local.rotation.y - FRAC_PI_3).abs() < 1e-4, "{:?}", node.local.rotation);
    // world transforms were refreshed after the tick
    assert!((node.world.rotation.y - FRAC_PI_3).abs() < 1e-4);
}

#[tokio::test]
async fn commands_repaint_the_loaded_car() {
    let mut showroom = Showroom::default();
    showroom.install(load_vehicle(&fixture_assets(), None).await.unwrap());
    showroom
        .apply(Command::MainColor("hsl(240, 100%, 50%)".to_string()))
        .unwrap();
    let paint = showroom.vehicle.main_material().unwrap();
    let Color { r, g, b } = showroom.scene.material(paint).unwrap().color;
    assert!(r.abs() < 1e-5 && g.abs() < 1e-5 && (b - 1.0).abs() < 1e-5);

    let err = showroom
        .apply(Command::WheelColor("not-a-color".to_string()))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidColor(_)));
}

#[tokio::test]
async fn missing_model_is_a_load_failure() {
    let mut assets = fixture_assets();
    assets.model = "models/missing.gltf".to_string();
    match load_vehicle(&assets, None).await {
        Err(Error::LoadFailure { asset, .. }) => assert_eq!(asset, "models/missing.gltf"),
        other => panic!("expected a load failure, got {other:?}"),
    }
}

#[tokio::test]
async fn mismatched_cube_faces_are_rejected() {
    let mut assets = fixture_assets();
    assets.env_map_faces[3] = "odd.png".to_string();
    match load_vehicle(&assets, None).await {
        Err(Error::LoadFailure { asset, .. }) => assert_eq!(asset, "env"),
        other => panic!("expected a load failure, got {other:?}"),
    }
}

#[tokio::test]
async fn cached_environment_map_is_reused() {
    let first = load_vehicle(&fixture_assets(), None).await.unwrap();
    let mut assets = fixture_assets();
    assets.env_map_dir = "does/not/exist".to_string();
    let second = load_vehicle(&assets, Some(Arc::clone(&first.env_map)))
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&first.env_map, &second.env_map));
}
