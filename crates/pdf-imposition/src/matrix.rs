//! 2D affine matrices in PDF's `[a b c d e f]` form
//!
//! Points are row vectors: `[x' y' 1] = [x y 1] · M`. Applying `T1` and then
//! `T2` is `T1.multiply(&T2)`.

use crate::constants::MATRIX_EPSILON;
use crate::types::Rotation;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AffineMatrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_array(m: [f32; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    pub fn to_array(self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Clockwise rotation about the origin, exact for quarter turns.
    pub fn rotation(rotation: Rotation) -> Self {
        let (sin, cos) = match rotation {
            Rotation::None => (0.0, 1.0),
            Rotation::Clockwise90 => (1.0, 0.0),
            Rotation::Clockwise180 => (0.0, -1.0),
            Rotation::Clockwise270 => (-1.0, 0.0),
        };
        Self::new(cos, -sin, sin, cos, 0.0, 0.0)
    }

    /// `self · other`: apply `self` first, then `other`.
    pub fn multiply(&self, other: &AffineMatrix) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > f32::EPSILON
    }

    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Self {
            a,
            b,
            c,
            d,
            e: -(self.e * a + self.f * c),
            f: -(self.e * b + self.f * d),
        })
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn approx_eq(&self, other: &AffineMatrix) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(l, r)| (l - r).abs() <= MATRIX_EPSILON * l.abs().max(r.abs()).max(1.0))
    }
}

impl fmt::Display for AffineMatrix {
    /// Formats the coefficients as `cm` operands.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
