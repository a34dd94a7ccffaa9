use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::IMAGE_EXTENSIONS;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported image type for {0:?}")]
    Unsupported(PathBuf),
    #[error("preload of {0:?} timed out")]
    TimedOut(PathBuf),
    #[error("preload worker for {0:?} went away")]
    Disconnected(PathBuf),
}

/// Asynchronous image preloading with an explicit completion signal.
///
/// `begin` starts a preload and returns at once. `poll` hands back the
/// outcome exactly once, when it is available; `None` means still pending.
pub trait ImageLoader {
    type Image;

    fn begin(&mut self, source: &Path);
    fn poll(&mut self) -> Option<Result<Self::Image, LoadError>>;
}

/// A fully decoded image, upright, as tightly packed RGBA8 pixels.
///
/// Only the GPU upload is left to do once a preload hands one of these back.
#[derive(Debug, Clone, PartialEq)]
pub struct Preloaded {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Reads images on a worker thread and reports back over a channel.
#[derive(Default)]
pub struct ThreadedLoader {
    pending: Option<(PathBuf, Receiver<Result<Preloaded, LoadError>>)>,
}

impl ThreadedLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageLoader for ThreadedLoader {
    type Image = Preloaded;

    fn begin(&mut self, source: &Path) {
        let (tx, rx) = mpsc::channel();
        let path = source.to_path_buf();
        debug!(path = %path.display(), "preloading");

        let worker_path = path.clone();
        thread::spawn(move || {
            // The receiver is gone when the preload was abandoned.
            let _ = tx.send(preload_file(&worker_path));
        });

        self.pending = Some((path, rx));
    }

    fn poll(&mut self) -> Option<Result<Preloaded, LoadError>> {
        let (path, rx) = self.pending.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Disconnected(path.clone())),
        };
        self.pending = None;
        Some(outcome)
    }
}

/// Reads and decodes the file, applying the EXIF orientation of JPEGs.
/// Runs on the preload worker; a file that does not decode never counts as
/// loaded.
pub fn preload_file(path: &Path) -> Result<Preloaded, LoadError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| LoadError::Unsupported(path.to_path_buf()))?;

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let orientation = if extension == "jpg" || extension == "jpeg" {
        read_orientation(path, &bytes)
    } else {
        1
    };
    if orientation != 1 {
        debug!(path = %path.display(), orientation, "applying EXIF orientation");
    }

    let rgba = apply_orientation(decoded, orientation).to_rgba8();
    Ok(Preloaded {
        path: path.to_path_buf(),
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Turns an image stored with EXIF `orientation` upright.
pub fn apply_orientation(image: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

fn read_orientation(path: &Path, bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| match &field.value {
                Value::Short(values) => values.first().copied(),
                _ => None,
            })
            .unwrap_or(1),
        Err(e) => {
            // Not fatal, the image is shown unrotated.
            warn!(path = %path.display(), error = %e, "could not read EXIF data");
            1
        }
    }
}
