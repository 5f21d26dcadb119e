// ── Validation policy ──
//
// Pure comparators, one per mutating operation. The cloud API is not
// transactional: it may silently round or clamp values but is authoritative,
// so some mismatch classes degrade to "adopt the server's value" instead of
// aborting. Identity, power-state, and dim-level mismatches indicate a
// broken request and stay fatal.

/// Hue values the server rounds by at most this much (absolute).
const HUE_TOLERANCE: f64 = 1.0;

/// Outcome of comparing a requested value against the server's echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Echo matches the request; commit the requested value.
    Match,
    /// Tolerable drift; warn and commit the server's value instead.
    Adopt,
    /// Intolerable mismatch; the operation fails.
    Reject,
}

/// Power state: exact, case-normalized. Mismatch is fatal.
pub fn power_state(requested: &str, echoed: &str) -> Verdict {
    if requested.eq_ignore_ascii_case(echoed) {
        Verdict::Match
    } else {
        Verdict::Reject
    }
}

/// Dim level: exact integer. Mismatch is fatal.
pub fn dim_level(requested: i64, echoed: i64) -> Verdict {
    if requested == echoed {
        Verdict::Match
    } else {
        Verdict::Reject
    }
}

/// Color temperature: exact integer, but the server clamps to the bulb's
/// supported range — mismatches adopt the echoed value.
pub fn color_temp(requested: i64, echoed: i64) -> Verdict {
    if requested == echoed {
        Verdict::Match
    } else {
        Verdict::Adopt
    }
}

/// Color pair: hue within ±1 absolute (the server rounds), saturation exact.
/// Anything outside that adopts the server's pair.
pub fn color(requested: (i64, i64), echoed: (f64, i64)) -> Verdict {
    let (hue, saturation) = requested;
    let (echoed_hue, echoed_saturation) = echoed;
    #[allow(clippy::cast_precision_loss)]
    let hue_close = (echoed_hue - hue as f64).abs() <= HUE_TOLERANCE;
    if hue_close && saturation == echoed_saturation {
        Verdict::Match
    } else {
        Verdict::Adopt
    }
}

/// Automation enabled flag: exact boolean. Mismatch is fatal.
pub fn enabled(requested: bool, echoed: bool) -> Verdict {
    if requested == echoed {
        Verdict::Match
    } else {
        Verdict::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_state_is_case_normalized() {
        assert_eq!(power_state("on", "ON"), Verdict::Match);
        assert_eq!(power_state("off", "OFF"), Verdict::Match);
        assert_eq!(power_state("on", "OFF"), Verdict::Reject);
    }

    #[test]
    fn dim_level_is_exact() {
        assert_eq!(dim_level(50, 50), Verdict::Match);
        assert_eq!(dim_level(50, 48), Verdict::Reject);
    }

    #[test]
    fn color_temp_adopts_on_drift() {
        assert_eq!(color_temp(3000, 3000), Verdict::Match);
        assert_eq!(color_temp(3000, 3050), Verdict::Adopt);
    }

    #[test]
    fn hue_within_tolerance_is_a_match() {
        assert_eq!(color((120, 50), (120.0, 50)), Verdict::Match);
        assert_eq!(color((120, 50), (121.0, 50)), Verdict::Match);
        assert_eq!(color((120, 50), (119.0, 50)), Verdict::Match);
    }

    #[test]
    fn hue_beyond_tolerance_adopts() {
        assert_eq!(color((120, 50), (121.5, 50)), Verdict::Adopt);
        assert_eq!(color((120, 50), (125.0, 50)), Verdict::Adopt);
    }

    #[test]
    fn saturation_drift_adopts_even_with_close_hue() {
        assert_eq!(color((120, 50), (120.0, 49)), Verdict::Adopt);
    }

    #[test]
    fn enabled_is_exact() {
        assert_eq!(enabled(true, true), Verdict::Match);
        assert_eq!(enabled(true, false), Verdict::Reject);
    }
}
