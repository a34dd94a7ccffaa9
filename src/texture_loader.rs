use anyhow::{Context, Result, ensure};
use raylib::prelude::*;

use crate::loader::Preloaded;

// --- Copy decoded pixels into a raylib Image and upload it as a texture ---
pub fn upload_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    preloaded: &Preloaded,
) -> Result<Texture2D> {
    let len = preloaded.width as usize * preloaded.height as usize * 4; // 4 bytes per pixel (RGBA)
    ensure!(
        preloaded.pixels.len() == len,
        "pixel buffer of {:?} holds {} bytes, expected {}",
        preloaded.path,
        preloaded.pixels.len(),
        len
    );

    // Blank RGBA8 image of the right size, then overwrite its pixel data
    let image = Image::gen_image_color(
        preloaded.width as i32,
        preloaded.height as i32,
        Color::BLANK,
    );
    unsafe {
        let image_ptr = image.data() as *mut u8;
        std::ptr::copy_nonoverlapping(preloaded.pixels.as_ptr(), image_ptr, len);
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("failed to create texture for {:?}", preloaded.path))?;

    // CPU copy is no longer needed once the texture is on the GPU
    drop(image);

    Ok(texture)
}

/// Source rectangle that crops a `tex_w` x `tex_h` texture to the aspect
/// ratio of the destination, centered, so it covers it without distortion.
pub fn cover_source_rect(tex_w: f32, tex_h: f32, dst_w: f32, dst_h: f32) -> Rectangle {
    if tex_w <= 0.0 || tex_h <= 0.0 || dst_w <= 0.0 || dst_h <= 0.0 {
        return Rectangle::new(0.0, 0.0, tex_w, tex_h);
    }
    let scale = (dst_w / tex_w).max(dst_h / tex_h);
    let src_w = dst_w / scale;
    let src_h = dst_h / scale;
    Rectangle::new((tex_w - src_w) * 0.5, (tex_h - src_h) * 0.5, src_w, src_h)
}
