use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LayerId {
    A,
    B,
}

impl LayerId {
    pub fn other(self) -> LayerId {
        match self {
            LayerId::A => LayerId::B,
            LayerId::B => LayerId::A,
        }
    }
}

/// Rotation bookkeeping shared by every cycle of the banner.
#[derive(Debug, Clone)]
pub struct RotationState {
    pub images: Vec<PathBuf>,
    pub current_index: usize,     // Image shown by the next completed transition
    pub active_layer_is_b: bool,  // Next fade target is layer B
    pub loading: bool,            // A preload is outstanding
}

impl RotationState {
    /// Callers guarantee `images` is not empty.
    pub fn new(images: Vec<PathBuf>) -> Self {
        Self {
            images,
            current_index: 0,
            active_layer_is_b: true,
            loading: false,
        }
    }

    pub fn target_layer(&self) -> LayerId {
        if self.active_layer_is_b { LayerId::B } else { LayerId::A }
    }

    pub fn current_image(&self) -> &PathBuf {
        &self.images[self.current_index]
    }

    pub fn step_index(&mut self) {
        self.current_index = (self.current_index + 1) % self.images.len();
    }

    pub fn toggle_layer(&mut self) {
        self.active_layer_is_b = !self.active_layer_is_b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn starts_on_first_image_targeting_b() {
        let state = RotationState::new(paths(&["a.jpg", "b.jpg"]));
        assert_eq!(state.current_index, 0);
        assert!(state.active_layer_is_b);
        assert!(!state.loading);
        assert_eq!(state.target_layer(), LayerId::B);
        assert_eq!(state.current_image(), &PathBuf::from("a.jpg"));
    }

    #[test]
    fn index_wraps_around() {
        let mut state = RotationState::new(paths(&["a.jpg", "b.jpg", "c.jpg"]));
        for expected in [1, 2, 0, 1] {
            state.step_index();
            assert_eq!(state.current_index, expected);
        }
    }

    #[test]
    fn single_image_stays_on_zero() {
        let mut state = RotationState::new(paths(&["only.png"]));
        state.step_index();
        state.step_index();
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn toggling_flips_target_layer() {
        let mut state = RotationState::new(paths(&["a.jpg"]));
        state.toggle_layer();
        assert_eq!(state.target_layer(), LayerId::A);
        assert_eq!(state.target_layer().other(), LayerId::B);
        state.toggle_layer();
        assert_eq!(state.target_layer(), LayerId::B);
    }
}
