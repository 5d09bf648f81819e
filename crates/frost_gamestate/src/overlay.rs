//! Full-screen fade surface

use frost_core::ScreenOverlay;

/// Headless fade-to-black surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FadeOverlay {
    opacity: f32,
    writes: u32,
}

impl FadeOverlay {
    /// Create a fully transparent overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of opacity writes so far
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Whether the screen is fully covered
    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }
}

impl ScreenOverlay for FadeOverlay {
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.writes += 1;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_clamped() {
        let mut overlay = FadeOverlay::new();
        overlay.set_opacity(1.7);
        assert_eq!(overlay.opacity(), 1.0);
        assert!(overlay.is_opaque());
        overlay.set_opacity(-0.3);
        assert_eq!(overlay.opacity(), 0.0);
        assert_eq!(overlay.writes(), 2);
    }
}
