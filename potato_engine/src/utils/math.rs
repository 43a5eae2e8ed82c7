//! Scalar math helpers

/// Clamp `value` to the inclusive range `[min, max]`.
///
/// Works for any partially ordered type, including floats. If `value` is
/// not comparable with the bounds (NaN), it is returned unchanged.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
