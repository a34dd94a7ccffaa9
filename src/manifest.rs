use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::IMAGE_EXTENSIONS;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no images listed in {0:?}")]
    Empty(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Sorted,
    Shuffled,
}

/// The banner image list as stored on disk: a plain JSON array of paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub images: Vec<PathBuf>,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Collects the image files directly inside `dir`.
pub fn scan_directory(dir: &Path, order: Order) -> Result<Vec<PathBuf>, ManifestError> {
    let io_err = |source| ManifestError::Io { path: dir.to_path_buf(), source };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }

    match order {
        Order::Sorted => paths.sort_by(|a, b| a.file_name().cmp(&b.file_name())),
        Order::Shuffled => paths.shuffle(&mut rand::rng()),
    }

    if paths.is_empty() {
        Err(ManifestError::Empty(dir.to_path_buf()))
    } else {
        Ok(paths)
    }
}

/// Reads a manifest. Relative entries are resolved against the manifest's
/// own directory.
pub fn read_manifest(path: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let bytes = fs::read(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: Manifest = serde_json::from_slice(&bytes)
        .map_err(|source| ManifestError::Json { path: path.to_path_buf(), source })?;

    if manifest.images.is_empty() {
        return Err(ManifestError::Empty(path.to_path_buf()));
    }

    let base = path.parent().unwrap_or(Path::new(""));
    Ok(manifest
        .images
        .into_iter()
        .map(|image| if image.is_relative() { base.join(image) } else { image })
        .collect())
}

pub fn write_manifest(path: &Path, images: &[PathBuf]) -> Result<(), ManifestError> {
    let manifest = Manifest { images: images.to_vec() };
    let mut json = serde_json::to_string_pretty(&manifest)
        .map_err(|source| ManifestError::Json { path: path.to_path_buf(), source })?;
    json.push('\n');
    fs::write(path, json).map_err(|source| ManifestError::Io { path: path.to_path_buf(), source })
}

/// Lists the images of `dir` relative to `relative_to`, the way a manifest
/// stored there should reference them.
pub fn generate(
    dir: &Path,
    relative_to: &Path,
    order: Order,
) -> Result<Vec<PathBuf>, ManifestError> {
    let images = scan_directory(dir, order)?;
    Ok(images
        .into_iter()
        .map(|image| match image.strip_prefix(relative_to) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => image,
        })
        .collect())
}
