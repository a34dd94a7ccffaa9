use crate::constants::*;

/// One of the two stacked full-window surfaces of the banner.
///
/// A layer owns whatever the host uses as a background image (a preloaded
/// file for the engine, a plain string in tests) together with its stacking
/// order and opacity. Fading is driven by `update`, one frame at a time.
pub struct Layer<I> {
    image: Option<I>,
    revision: u64,

    z_index: i32,
    opacity: f32,

    fade_from: f32,
    fade_duration: f32,
    animation_timer: f32,
    is_animating: bool,
}

impl<I> Layer<I> {
    pub fn new(z_index: i32) -> Self {
        Self {
            image: None,
            revision: 0,
            z_index,
            opacity: 1.0,
            fade_from: 1.0,
            fade_duration: 0.0,
            animation_timer: 0.0,
            is_animating: false,
        }
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    /// Bumped every time the background image is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_image(&mut self, image: I) {
        self.image = Some(image);
        self.revision += 1;
    }

    /// Higher draws in front.
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Starts fading to fully transparent. A zero duration hides the layer
    /// at once; completion is still reported by the next `update`.
    pub fn fade_out(&mut self, duration: f32) {
        self.fade_from = self.opacity;
        self.fade_duration = duration.max(0.0);
        self.animation_timer = 0.0;
        self.is_animating = true;
        if self.fade_duration == 0.0 {
            self.opacity = 0.0;
        }
    }

    /// Makes the layer fully opaque immediately. Returns true when this cut
    /// a running fade short.
    pub fn show(&mut self) -> bool {
        let interrupted = self.is_animating;
        self.is_animating = false;
        self.animation_timer = 0.0;
        self.opacity = 1.0;
        interrupted
    }

    /// Advances the fade. Returns true on the frame the fade completes.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.is_animating {
            return false;
        }
        self.animation_timer += dt;

        if self.animation_timer >= self.fade_duration {
            self.is_animating = false;
            self.opacity = 0.0;
            return true;
        }

        let t = (self.animation_timer / self.fade_duration).min(1.0);
        self.opacity = self.fade_from * (1.0 - t);
        false
    }
}

/// Puts `upper` in front of `lower`.
pub fn restack<I>(upper: &mut Layer<I>, lower: &mut Layer<I>) {
    upper.z_index = FRONT_Z_INDEX;
    lower.z_index = BACK_Z_INDEX;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_layer_is_opaque_and_empty() {
        let layer: Layer<&str> = Layer::new(FRONT_Z_INDEX);
        assert!(layer.is_visible());
        assert!(layer.image().is_none());
        assert_eq!(layer.revision(), 0);
    }

    #[test]
    fn setting_an_image_bumps_the_revision() {
        let mut layer = Layer::new(BACK_Z_INDEX);
        layer.set_image("a.jpg");
        layer.set_image("b.jpg");
        assert_eq!(layer.image(), Some(&"b.jpg"));
        assert_eq!(layer.revision(), 2);
    }

    #[test]
    fn zero_duration_fade_hides_immediately() {
        let mut layer: Layer<&str> = Layer::new(FRONT_Z_INDEX);
        layer.fade_out(0.0);
        assert!(!layer.is_visible());
        assert!(layer.update(0.0));
        assert!(!layer.update(0.016));
    }

    #[test]
    fn fade_ramps_opacity_down_linearly() {
        let mut layer: Layer<&str> = Layer::new(FRONT_Z_INDEX);
        layer.fade_out(1.0);
        assert!(!layer.update(0.25));
        assert!((layer.opacity() - 0.75).abs() < 1e-5);
        assert!(!layer.update(0.5));
        assert!((layer.opacity() - 0.25).abs() < 1e-5);
        assert!(layer.update(0.25));
        assert_eq!(layer.opacity(), 0.0);
        assert!(!layer.is_animating());
    }

    #[test]
    fn completion_is_reported_once() {
        let mut layer: Layer<&str> = Layer::new(FRONT_Z_INDEX);
        layer.fade_out(0.1);
        assert!(layer.update(0.2));
        assert!(!layer.update(0.2));
    }

    #[test]
    fn show_cancels_a_running_fade() {
        let mut layer: Layer<&str> = Layer::new(FRONT_Z_INDEX);
        layer.fade_out(1.0);
        layer.update(0.5);
        assert!(layer.show());
        assert_eq!(layer.opacity(), 1.0);
        assert!(!layer.update(1.0));
        assert!(!layer.show());
    }

    #[test]
    fn fields_only_change_through_fades() {
        let mut layer: Layer<&str> = Layer::new(BACK_Z_INDEX);
        assert_eq!(layer.z_index(), BACK_Z_INDEX);
        assert!(!layer.is_animating());
        layer.fade_out(2.0);
        assert!(layer.is_animating());
        assert_eq!(layer.opacity(), 1.0);
        layer.update(1.0);
        assert!((layer.opacity() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn restack_orders_layers() {
        let mut a: Layer<&str> = Layer::new(BACK_Z_INDEX);
        let mut b: Layer<&str> = Layer::new(FRONT_Z_INDEX);
        restack(&mut a, &mut b);
        assert!(a.z_index() > b.z_index());
    }
}
