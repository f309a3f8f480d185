// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Beam colors and blending.

/// A linear RGBA color with `f32` channels in `0.0..=1.0`.
///
/// Comparison is exact (`PartialEq` on the raw channels). Catchers rely on
/// that: a target color is satisfied only by a bit-for-bit equal blend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Opaque black, also used as the "no color" value of idle relays and catchers.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// An opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// A color with explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Blend colors by averaging each of red, green, and blue independently.
///
/// Alpha is ignored on input and always opaque on output. Returns `None` for
/// an empty input.
///
/// ```rust
/// use understory_beam::{Color, color::mean};
///
/// let blended = mean([Color::RED, Color::GREEN]).unwrap();
/// assert_eq!(blended, Color::rgba(0.5, 0.5, 0.0, 1.0));
/// assert!(mean([]).is_none());
/// ```
pub fn mean(colors: impl IntoIterator<Item = Color>) -> Option<Color> {
    let mut count = 0_u32;
    let (mut r, mut g, mut b) = (0.0_f32, 0.0_f32, 0.0_f32);
    for c in colors {
        r += c.r;
        g += c.g;
        b += c.b;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "Contributor counts are tiny; f32 represents them exactly."
    )]
    let n = count as f32;
    Some(Color::rgb(r / n, g / n, b / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_ignores_input_alpha() {
        let c = mean([Color::rgba(1.0, 0.0, 0.0, 0.2), Color::rgba(0.0, 0.0, 1.0, 0.4)])
            .expect("non-empty");
        assert_eq!(c, Color::rgb(0.5, 0.0, 0.5));
    }

    #[test]
    fn mean_of_one_is_identity_with_opaque_alpha() {
        let c = mean([Color::rgba(0.25, 0.5, 0.75, 0.0)]).expect("non-empty");
        assert_eq!(c, Color::rgb(0.25, 0.5, 0.75));
    }

    #[test]
    fn mean_of_three() {
        let c = mean([Color::RED, Color::GREEN, Color::BLUE]).expect("non-empty");
        assert_eq!(c, Color::rgb(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0));
    }
}
