use std::f64::consts::PI;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Cosine ease-in/out over `[0, 1]`; inputs outside the range are clamped.
///
/// Symmetric around `0.5` with zero slope at both ends.
pub fn ease_in_out_cosine(u: f64) -> f64 {
    0.5 * (1.0 - (PI * u.clamp(0.0, 1.0)).cos())
}

/// Floating-point modulo that always lands in `[0, m)` for positive `m`.
pub(crate) fn wrap(v: f64, m: f64) -> f64 {
    v.rem_euclid(m)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
