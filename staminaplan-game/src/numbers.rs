//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Saturate an i64 into the i32 range.
#[must_use]
pub fn saturate_i64_to_i32(value: i64) -> i32 {
    let clamped = value.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    cast::<i64, i32>(clamped).unwrap_or(0)
}

/// Saturate an i64 into the u8 range.
#[must_use]
pub fn saturate_i64_to_u8(value: i64) -> u8 {
    let clamped = value.clamp(0, i64::from(u8::MAX));
    cast::<i64, u8>(clamped).unwrap_or(0)
}

/// Saturate an i64 into the u32 range.
#[must_use]
pub fn saturate_i64_to_u32(value: i64) -> u32 {
    let clamped = value.clamp(0, i64::from(u32::MAX));
    cast::<i64, u32>(clamped).unwrap_or(0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Percentage of `part` over `whole`, 0.0 when `whole` is zero.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    usize_to_f64(part) / usize_to_f64(whole) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_casts_cover_ranges() {
        assert_eq!(saturate_i64_to_i32(i64::MAX), i32::MAX);
        assert_eq!(saturate_i64_to_i32(-5), -5);
        assert_eq!(saturate_i64_to_u8(-1), 0);
        assert_eq!(saturate_i64_to_u8(300), u8::MAX);
        assert_eq!(saturate_i64_to_u32(i64::MIN), 0);
        assert_eq!(saturate_i64_to_u32(42), 42);
    }

    #[test]
    fn percentage_handles_empty_whole() {
        assert!((percentage(3, 0) - 0.0).abs() < f64::EPSILON);
        assert!((percentage(1, 4) - 25.0).abs() < f64::EPSILON);
    }
}
