use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::*;
use crate::layer::{restack, Layer};
use crate::loader::{ImageLoader, LoadError};
use crate::state::{LayerId, RotationState};

#[derive(Debug, Error)]
pub enum RotatorError {
    #[error("the banner needs at least one image")]
    EmptyImageList,
}

/// What happens when a preload fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Keep `loading` set forever; every later trigger is dropped.
    Stall,
    /// Forget the broken image and try the next one on the next trigger.
    Skip,
}

#[derive(Debug, Clone, Copy)]
pub struct RotatorOptions {
    pub fade_duration: f32,         // Seconds
    pub failure_policy: FailurePolicy,
    pub load_timeout: Option<f32>,  // Seconds, None waits forever
}

impl Default for RotatorOptions {
    fn default() -> Self {
        Self {
            fade_duration: FADE_DURATION_MS as f32 / 1000.0,
            failure_policy: FailurePolicy::Stall,
            load_timeout: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Advance {
    Started,
    Dropped,
}

struct PendingLoad {
    target: LayerId,
    path: PathBuf,
    elapsed: f32,
}

/// Crossfading two layers through a fixed list of images.
///
/// `advance` kicks off a preload of the current image into the hidden layer.
/// The host loop calls `update` every frame; it delivers the preload outcome
/// and drives the fade-out of the layer on top. The index moves on when that
/// fade completes.
pub struct BannerRotator<L: ImageLoader> {
    state: RotationState,
    layer_a: Layer<L::Image>,
    layer_b: Layer<L::Image>,
    loader: L,
    options: RotatorOptions,

    pending: Option<PendingLoad>,
    fading: Option<LayerId>,
    transitions: u64,
}

impl<L: ImageLoader> BannerRotator<L> {
    pub fn new(
        images: Vec<PathBuf>,
        loader: L,
        options: RotatorOptions,
    ) -> Result<Self, RotatorError> {
        if images.is_empty() {
            return Err(RotatorError::EmptyImageList);
        }

        let layer_a = Layer::new(BACK_Z_INDEX);
        let mut layer_b = Layer::new(FRONT_Z_INDEX);
        // Layer A is the visible surface until the first transition.
        layer_b.fade_out(0.0);

        Ok(Self {
            state: RotationState::new(images),
            layer_a,
            layer_b,
            loader,
            options,
            pending: None,
            fading: None,
            transitions: 0,
        })
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn layer(&self, id: LayerId) -> &Layer<L::Image> {
        match id {
            LayerId::A => &self.layer_a,
            LayerId::B => &self.layer_b,
        }
    }

    fn layer_mut(&mut self, id: LayerId) -> &mut Layer<L::Image> {
        match id {
            LayerId::A => &mut self.layer_a,
            LayerId::B => &mut self.layer_b,
        }
    }

    /// Layers from back to front.
    pub fn draw_order(&self) -> [(LayerId, &Layer<L::Image>); 2] {
        let a = (LayerId::A, &self.layer_a);
        let b = (LayerId::B, &self.layer_b);
        if self.layer_a.z_index() <= self.layer_b.z_index() { [a, b] } else { [b, a] }
    }

    pub fn front(&self) -> LayerId {
        self.draw_order()[1].0
    }

    /// Completed transitions since startup.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// True once a failed preload has left `loading` set for good.
    pub fn is_stalled(&self) -> bool {
        self.state.loading && self.pending.is_none()
    }

    #[cfg(test)]
    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn advance(&mut self) -> Advance {
        if self.state.loading {
            debug!(index = self.state.current_index, "preload outstanding, trigger dropped");
            return Advance::Dropped;
        }

        self.state.loading = true;
        let target = self.state.target_layer();
        let path = self.state.current_image().clone();
        debug!(
            index = self.state.current_index,
            ?target,
            path = %path.display(),
            "advancing banner"
        );

        self.loader.begin(&path);
        self.pending = Some(PendingLoad { target, path, elapsed: 0.0 });

        self.state.toggle_layer();
        Advance::Started
    }

    pub fn update(&mut self, dt: f32) {
        let a_done = self.layer_a.update(dt);
        let b_done = self.layer_b.update(dt);
        let finished = match self.fading {
            Some(LayerId::A) => a_done,
            Some(LayerId::B) => b_done,
            None => false,
        };
        if finished {
            self.fading = None;
            self.complete_transition();
        }

        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        pending.elapsed += dt;

        match self.loader.poll() {
            Some(Ok(image)) => self.on_loaded(image),
            Some(Err(e)) => self.on_failed(e),
            None => {
                let timed_out = self
                    .options
                    .load_timeout
                    .is_some_and(|limit| pending.elapsed >= limit);
                if timed_out {
                    let path = pending.path.clone();
                    self.on_failed(LoadError::TimedOut(path));
                }
            }
        }
    }

    fn on_loaded(&mut self, image: L::Image) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let target = pending.target;
        let source = target.other();
        let previous_fade = self.fading;

        self.layer_mut(target).set_image(image);

        // The outgoing image stays on top while it dissolves.
        match source {
            LayerId::A => restack(&mut self.layer_a, &mut self.layer_b),
            LayerId::B => restack(&mut self.layer_b, &mut self.layer_a),
        }

        let fade = self.options.fade_duration;
        self.layer_mut(source).fade_out(fade);
        self.fading = Some(source);

        // A fade longer than the rotation interval is cut short here, which
        // still counts as a finished transition.
        if self.layer_mut(target).show() && previous_fade == Some(target) {
            self.complete_transition();
        }

        self.state.loading = false;
        info!(path = %pending.path.display(), ?target, "banner image shown");
    }

    fn on_failed(&mut self, error: LoadError) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match self.options.failure_policy {
            FailurePolicy::Stall => {
                warn!(error = %error, "banner preload failed, rotation stalled");
            }
            FailurePolicy::Skip => {
                warn!(error = %error, "banner preload failed, skipping image");
                self.state.step_index();
                // Retry into the same hidden layer.
                self.state.active_layer_is_b = pending.target == LayerId::B;
                self.state.loading = false;
            }
        }
    }

    fn complete_transition(&mut self) {
        self.state.step_index();
        self.transitions += 1;
        debug!(
            index = self.state.current_index,
            transitions = self.transitions,
            "transition complete"
        );
    }
}
