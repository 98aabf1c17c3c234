//! Loading of models, animations and environment maps from the asset directory.

use std::{path::Path, sync::Arc};

use base64::Engine;
use log::{debug, info};

use crate::{
    config::AssetConfig,
    data_structures::{
        instance::Instance,
        material::{Color, Material, MaterialKind},
        scene_graph::{MaterialId, NodeId, SceneGraph, SceneNode},
        texture::EnvironmentMap,
    },
    error::Error,
    resources::{
        animation::{AnimationChannel, AnimationClip, Keyframes},
        texture::{load_binary, load_environment_map},
    },
};

pub mod animation;
pub mod texture;

/// A glTF scene converted into a [`SceneGraph`] plus its animation clips.
///
/// Clip channels target handles of `scene`; retarget them after grafting the
/// scene somewhere else.
#[derive(Debug)]
pub struct LoadedModel {
    pub scene: SceneGraph,
    pub clips: Vec<AnimationClip>,
}

/// Everything a successful vehicle load hands to the classifier.
#[derive(Debug)]
pub struct LoadedVehicle {
    pub model: LoadedModel,
    pub env_map: Arc<EnvironmentMap>,
}

async fn load_buffer(asset_dir: &Path, model_dir: &str, uri: &str) -> anyhow::Result<Vec<u8>> {
    if let Some(data) = uri.strip_prefix("data:") {
        let (_, payload) = data
            .split_once(";base64,")
            .ok_or_else(|| anyhow::anyhow!("unsupported data uri in buffer"))?;
        return Ok(base64::engine::general_purpose::STANDARD.decode(payload)?);
    }
    let file_name = if model_dir.is_empty() {
        uri.to_string()
    } else {
        format!("{}/{}", model_dir, uri)
    };
    load_binary(asset_dir, &file_name).await
}

fn add_gltf_node(
    scene: &mut SceneGraph,
    parent: NodeId,
    node: gltf::scene::Node,
    materials: &[MaterialId],
    mapping: &mut Vec<Option<NodeId>>,
) {
    let (translation, [x, y, z, w], scale) = node.transform().decomposed();
    let local = Instance::from_trs(translation, cgmath::Quaternion::new(w, x, y, z), scale);
    let primitive_materials: Vec<Option<MaterialId>> = node
        .mesh()
        .map(|mesh| {
            mesh.primitives()
                .map(|prim| prim.material().index().and_then(|idx| materials.get(idx).copied()))
                .collect()
        })
        .unwrap_or_default();
    let mut scene_node = SceneNode::new(node.name().unwrap_or_default()).with_transform(local);
    if let [material] = primitive_materials.as_slice() {
        scene_node.material = *material;
    }

    let id = scene.add_node(parent, scene_node);
    if let Some(slot) = mapping.get_mut(node.index()) {
        *slot = Some(id);
    }
    // A mesh with several primitives becomes a group: one child per primitive,
    // named `<mesh>_<index>`, each carrying that primitive's material.
    if primitive_materials.len() > 1 {
        if let Some(mesh) = node.mesh() {
            let mesh_name = mesh
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
            for (idx, material) in primitive_materials.into_iter().enumerate() {
                let mut part = SceneNode::new(format!("{mesh_name}_{idx}"));
                part.material = material;
                scene.add_node(id, part);
            }
        }
    }
    for child in node.children() {
        add_gltf_node(scene, id, child, materials, mapping);
    }
}

fn to_material(material: gltf::Material) -> Material {
    let name = material.name().unwrap_or_default();
    let mut converted = Material::new(name, MaterialKind::Standard);
    let [r, g, b, _] = material.pbr_metallic_roughness().base_color_factor();
    converted.color = Color::new(r, g, b);
    let [r, g, b] = material.emissive_factor();
    converted.emissive = Color::new(r, g, b);
    converted
}

fn to_channel(
    channel: gltf::animation::Channel,
    buffers: &[Vec<u8>],
    mapping: &[Option<NodeId>],
) -> Option<AnimationChannel> {
    let target = mapping
        .get(channel.target().node().index())
        .copied()
        .flatten()?;
    let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
    let timestamps: Vec<f32> = match reader.read_inputs() {
        Some(inputs) => inputs.collect(),
        None => {
            debug!("No timestamps found in channel {}", channel.index());
            Vec::new()
        }
    };
    use gltf::animation::util::ReadOutputs;
    let keyframes = match reader.read_outputs() {
        Some(ReadOutputs::Translations(translations)) => {
            Keyframes::Translation(translations.map(Into::into).collect())
        }
        Some(ReadOutputs::Rotations(rotations)) => Keyframes::Rotation(
            rotations
                .into_f32()
                .map(|[x, y, z, w]| cgmath::Quaternion::new(w, x, y, z))
                .collect(),
        ),
        Some(ReadOutputs::Scales(scales)) => Keyframes::Scale(scales.map(Into::into).collect()),
        // Morph targets are not animated by this crate
        Some(ReadOutputs::MorphTargetWeights(_)) | None => Keyframes::Other,
    };
    Some(AnimationChannel {
        target,
        keyframes,
        timestamps,
    })
}

/// Load a `.gltf` or `.glb` file into a fresh scene graph.
///
/// Buffers may be embedded in a GLB, given as base64 `data:` URIs, or stored
/// next to the model file.
pub async fn load_model_gltf(asset_dir: &Path, file_name: &str) -> anyhow::Result<LoadedModel> {
    let bytes = load_binary(asset_dir, file_name).await?;
    let gltf = gltf::Gltf::from_slice(&bytes)?;
    let model_dir = Path::new(file_name)
        .parent()
        .and_then(|p| p.to_str())
        .unwrap_or_default();

    // Load buffers
    let mut buffers = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("{} references a missing GLB blob", file_name))?;
                buffers.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                buffers.push(load_buffer(asset_dir, model_dir, uri).await?);
            }
        }
    }

    let mut scene = SceneGraph::new();
    let materials: Vec<MaterialId> = gltf
        .materials()
        .map(|material| scene.add_material(to_material(material)))
        .collect();

    let mut mapping = vec![None; gltf.nodes().count()];
    if let Some(gltf_scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
        for node in gltf_scene.nodes() {
            add_gltf_node(&mut scene, SceneGraph::ROOT, node, &materials, &mut mapping);
        }
    }

    let clips = gltf
        .animations()
        .enumerate()
        .map(|(idx, animation)| {
            let channels = animation
                .channels()
                .filter_map(|channel| to_channel(channel, &buffers, &mapping))
                .collect();
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("animation_{}", idx));
            AnimationClip::new(name, channels)
        })
        .collect::<Vec<_>>();

    info!(
        "Loaded {}: {} nodes, {} materials, {} animations",
        file_name,
        scene.len() - 1,
        materials.len(),
        clips.len()
    );
    Ok(LoadedModel { scene, clips })
}

/// Load the vehicle model and its environment map.
///
/// A map from an earlier load is reused instead of being decoded again.
pub async fn load_vehicle(
    assets: &AssetConfig,
    cached_env_map: Option<Arc<EnvironmentMap>>,
) -> Result<LoadedVehicle, Error> {
    let model = load_model_gltf(&assets.asset_dir, &assets.model)
        .await
        .map_err(|e| Error::load(&assets.model, e))?;
    let env_map = match cached_env_map {
        Some(env_map) => env_map,
        None => Arc::new(
            load_environment_map(&assets.asset_dir, &assets.env_map_dir, &assets.env_map_faces)
                .await
                .map_err(|e| Error::load(&assets.env_map_dir, e))?,
        ),
    };
    Ok(LoadedVehicle { model, env_map })
}
