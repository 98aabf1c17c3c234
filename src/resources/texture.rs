use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::future::try_join_all;

use crate::data_structures::texture::{EnvironmentMap, FACE_COUNT};

/// Resolve `file_name` against the asset directory.
pub fn asset_path(asset_dir: &Path, file_name: &str) -> PathBuf {
    asset_dir.join(file_name)
}

pub async fn load_binary(asset_dir: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(asset_dir, file_name);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

/// Load the six faces of a cube map from `dir` (relative to the asset directory).
///
/// `faces` are file names in +X, -X, +Y, -Y, +Z, -Z order. The faces are read
/// concurrently; the first failure aborts the whole map.
pub async fn load_environment_map(
    asset_dir: &Path,
    dir: &str,
    faces: &[String; FACE_COUNT],
) -> anyhow::Result<EnvironmentMap> {
    let decoded = try_join_all(faces.iter().map(|face| async move {
        let file_name = format!("{}/{}", dir.trim_end_matches('/'), face);
        let bytes = load_binary(asset_dir, &file_name).await?;
        let format = Path::new(face).extension().and_then(|ext| ext.to_str());
        EnvironmentMap::face_from_bytes(&bytes, &file_name, format)
    }))
    .await?;

    let faces: [image::RgbImage; FACE_COUNT] = decoded
        .try_into()
        .map_err(|v: Vec<_>| anyhow::anyhow!("expected {} cube faces, got {}", FACE_COUNT, v.len()))?;
    EnvironmentMap::from_faces(faces)
}
