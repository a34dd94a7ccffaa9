pub const WINDOW_WIDTH: i32 = 1280;           // Default window width
pub const WINDOW_HEIGHT: i32 = 720;           // Default window height
pub const FPS: u32 = 60;                      // Frames per second

pub const ROTATE_INTERVAL_MS: u64 = 5000;     // Time between two advance() triggers
pub const FADE_DURATION_MS: u64 = 1000;       // Duration of the source layer fade-out

pub const BACK_Z_INDEX: i32 = -6;             // Stacking order of the lower layer
pub const FRONT_Z_INDEX: i32 = -5;            // Stacking order of the upper layer

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];
