//! RGBA color values.

use serde::{Deserialize, Serialize};

/// An RGBA color as stored in the color grid and sent over the wire.
///
/// Serializes as a plain 4-element array `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Fully transparent black, used for cells of eliminated squares.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);

    /// Construct from individual channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// The red channel.
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    /// The green channel.
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    /// The blue channel.
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    /// The alpha channel.
    pub const fn a(self) -> u8 {
        self.0[3]
    }

    /// Blend the RGB channels toward white by `t` in `[0, 1]`,
    /// leaving alpha untouched. Used for elevation shading.
    pub fn lighten(self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |c: u8| -> u8 {
            let f = f32::from(c) + (255.0 - f32::from(c)) * t;
            f.round().clamp(0.0, 255.0) as u8
        };
        Self([mix(self.0[0]), mix(self.0[1]), mix(self.0[2]), self.0[3]])
    }
}
