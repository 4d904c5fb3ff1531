//! Pointer mapping

use crate::tuning::Tuning;

/// Convert a client-space pointer x into a clamped playfield x
///
/// `rect_left` and `rect_width` describe the playfield element as laid out on
/// screen. A collapsed element maps to the middle of the claw's travel.
pub fn map_pointer(client_x: f32, rect_left: f32, rect_width: f32, tuning: &Tuning) -> f32 {
    let width = tuning.physics.width;
    if rect_width.is_nan() || rect_width <= 0.0 || !client_x.is_finite() {
        return tuning.clamp_claw_x(width / 2.0);
    }
    let x = (client_x - rect_left) * width / rect_width;
    tuning.clamp_claw_x(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_to_playfield() {
        let tuning = Tuning::default();
        // Element drawn at half size, 100px from the left
        let x = map_pointer(100.0 + 117.0, 100.0, 234.0, &tuning);
        assert!((x - 234.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamps_to_claw_travel() {
        let tuning = Tuning::default();
        assert_eq!(map_pointer(-50.0, 0.0, 468.0, &tuning), 58.0);
        assert_eq!(map_pointer(10_000.0, 0.0, 468.0, &tuning), 410.0);
        assert_eq!(map_pointer(58.0, 0.0, 468.0, &tuning), 58.0);
    }

    #[test]
    fn test_degenerate_rect() {
        let tuning = Tuning::default();
        assert_eq!(map_pointer(300.0, 0.0, 0.0, &tuning), 234.0);
        assert_eq!(map_pointer(f32::NAN, 0.0, 468.0, &tuning), 234.0);
    }
}
