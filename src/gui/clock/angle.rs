pub const RADIANS_PER_DEGREE: f64 = std::f64::consts::PI / 180.0;

/// Wraps any angle (degrees) into `[0, 360)`. Non-finite input is treated as 0.
pub fn normalize(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Returns the absolute angle the hand should travel to in order to reach
/// something congruent to `to` while turning at most half a circle.
///
/// The result is not wrapped: going from 350 to 10 yields 370, so an
/// interpolation between the two never sweeps back through 180.
pub fn shortest_angle(from: f64, to: f64) -> f64 {
    let angle = normalize(from);
    let offset = if angle < 180.0 && to > angle + 180.0 {
        -360.0
    } else if angle >= 180.0 && to <= angle - 180.0 {
        360.0
    } else {
        0.0
    };
    from + offset + (to - angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(725.0), 5.0);
        assert_eq!(normalize(-90.0), 270.0);
        assert_eq!(normalize(f64::NAN), 0.0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for x in [-1080.5, -360.0, -0.25, 0.0, 12.0, 359.999, 360.0, 1234.5] {
            let once = normalize(x);
            assert!((0.0..360.0).contains(&once), "{x} -> {once}");
            assert_eq!(normalize(once), once);
        }
    }

    #[test]
    fn test_shortest_angle_crosses_zero_forward() {
        // 350 -> 10 goes through 360, not back through 180
        assert!(close(shortest_angle(350.0, 10.0), 370.0));
    }

    #[test]
    fn test_shortest_angle_crosses_zero_backward() {
        assert!(close(shortest_angle(10.0, 350.0), -10.0));
    }

    #[test]
    fn test_shortest_angle_keeps_accumulated_turns() {
        // hand already wound past a full turn
        assert!(close(shortest_angle(370.0, 30.0), 390.0));
        assert!(close(shortest_angle(-20.0, 300.0), -60.0));
    }

    #[test]
    fn test_shortest_angle_half_turn_boundary() {
        assert!(close(shortest_angle(0.0, 180.0), 180.0));
        assert!(close(shortest_angle(180.0, 0.0), 360.0));
    }

    #[test]
    fn test_shortest_angle_is_congruent_and_short() {
        let mut from = 0.0;
        while from < 360.0 {
            let mut to = 0.0;
            while to < 360.0 {
                let target = shortest_angle(from, to);
                let congruence = normalize(target - to);
                assert!(
                    close(congruence, 0.0) || close(congruence, 360.0),
                    "{from} -> {to} gave {target}"
                );
                assert!((target - from).abs() <= 180.0, "{from} -> {to} gave {target}");
                to += 7.5;
            }
            from += 5.0;
        }
    }
}
