use std::path::PathBuf;

use anyhow::Result;
use raylib::prelude::*;
use tracing::{debug, error};

use crate::layer::Layer;
use crate::loader::{Preloaded, ThreadedLoader};
use crate::rotator::{BannerRotator, RotatorOptions};
use crate::state::LayerId;
use crate::texture_loader::{cover_source_rect, upload_texture};
use crate::ticker::Ticker;

/// GPU side of one layer: the texture for the layer revision it was made from.
#[derive(Default)]
struct LayerTexture {
    texture: Option<Texture2D>,
    revision: u64,
}

impl LayerTexture {
    fn sync(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, layer: &Layer<Preloaded>) {
        if layer.revision() == self.revision {
            return;
        }
        self.revision = layer.revision();
        let Some(preloaded) = layer.image() else {
            return;
        };
        match upload_texture(rl, thread, preloaded) {
            Ok(texture) => self.texture = Some(texture),
            // Keep drawing the previous texture.
            Err(e) => error!("{e:#}"),
        }
    }
}

pub struct BannerEngine {
    rotator: BannerRotator<ThreadedLoader>,
    ticker: Ticker,
    texture_a: LayerTexture,
    texture_b: LayerTexture,
}

impl BannerEngine {
    pub fn new(images: Vec<PathBuf>, interval: f32, options: RotatorOptions) -> Result<Self> {
        Ok(Self {
            rotator: BannerRotator::new(images, ThreadedLoader::new(), options)?,
            ticker: Ticker::new(interval),
            texture_a: LayerTexture::default(),
            texture_b: LayerTexture::default(),
        })
    }

    pub fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread) {
        for _ in 0..self.ticker.tick(dt) {
            self.rotator.advance();
            self.log_state();
        }
        self.rotator.update(dt);

        self.texture_a.sync(rl, thread, self.rotator.layer(LayerId::A));
        self.texture_b.sync(rl, thread, self.rotator.layer(LayerId::B));

        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::BLACK);

        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;

        for (id, layer) in self.rotator.draw_order() {
            let gpu = match id {
                LayerId::A => &self.texture_a,
                LayerId::B => &self.texture_b,
            };
            let Some(texture) = gpu.texture.as_ref() else {
                continue;
            };
            if !layer.is_visible() {
                continue;
            }

            let source = cover_source_rect(texture.width() as f32, texture.height() as f32, sw, sh);
            d.draw_texture_pro(
                texture,
                source,
                Rectangle::new(0.0, 0.0, sw, sh),
                Vector2::new(0.0, 0.0),
                0.0,
                Color::WHITE.fade(layer.opacity()),
            );
        }
    }

    fn log_state(&self) {
        let state = self.rotator.state();
        debug!(
            index = state.current_index,
            loading = state.loading,
            active_layer_is_b = state.active_layer_is_b,
            front = ?self.rotator.front(),
            transitions = self.rotator.transitions(),
            stalled = self.rotator.is_stalled(),
            "banner state"
        );
    }
}
