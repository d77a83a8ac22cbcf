/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns a bit pattern for `value` that is identical for values that should
/// compare equal structurally.
///
/// `-0.0` maps to the bits of `0.0` and every NaN maps to the canonical quiet
/// NaN, so the result can back both `Eq` and `Hash`.
#[must_use]
pub fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// Structural equality of two scalars, consistent with [`canonical_bits`].
#[must_use]
pub fn scalar_eq(a: f64, b: f64) -> bool {
    canonical_bits(a) == canonical_bits(b)
}

/// Structural equality of two points, consistent with [`canonical_bits`].
#[must_use]
pub fn point_eq(a: &Point3, b: &Point3) -> bool {
    scalar_eq(a.x, b.x) && scalar_eq(a.y, b.y) && scalar_eq(a.z, b.z)
}

/// Structural equality of two vectors, consistent with [`canonical_bits`].
#[must_use]
pub fn vector_eq(a: &Vector3, b: &Vector3) -> bool {
    scalar_eq(a.x, b.x) && scalar_eq(a.y, b.y) && scalar_eq(a.z, b.z)
}

/// Returns `true` if all three coordinates are finite.
#[must_use]
pub fn is_finite_point(p: &Point3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}
