//! Common math types used across rwscene
//!
//! The matrix type follows the row-vector convention (`v' = v * M`), so a
//! product `A * B` applies `A` before `B`. World transforms for placed
//! objects compose as `Scale * Rotation * Translation`.

use serde::{Deserialize, Serialize};

/// 3D vector (position, scale, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Rotation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 4x4 transformation matrix, row-major with translation in the last row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4x4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4x4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create a scaling matrix
    pub fn from_scale(scale: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.m[0][0] = scale.x;
        m.m[1][1] = scale.y;
        m.m[2][2] = scale.z;
        m
    }

    /// Create a rotation matrix from a quaternion
    pub fn from_quat(q: Quat) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);

        Self {
            m: [
                [1.0 - 2.0 * (yy + zz), 2.0 * (xy + zw), 2.0 * (xz - yw), 0.0],
                [2.0 * (xy - zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + xw), 0.0],
                [2.0 * (xz + yw), 2.0 * (yz - xw), 1.0 - 2.0 * (xx + yy), 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Create a translation matrix
    pub fn from_translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.m[3][0] = t.x;
        m.m[3][1] = t.y;
        m.m[3][2] = t.z;
        m
    }

    /// Matrix product; with row vectors, `self` is applied first
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Self { m: out }
    }

    /// Get translation component
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[3][0], self.m[3][1], self.m[3][2])
    }

    /// Transform a point (row-vector convention)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x * self.m[0][0] + p.y * self.m[1][0] + p.z * self.m[2][0] + self.m[3][0],
            p.x * self.m[0][1] + p.y * self.m[1][1] + p.z * self.m[2][1] + self.m[3][1],
            p.x * self.m[0][2] + p.y * self.m[1][2] + p.z * self.m[2][2] + self.m[3][2],
        )
    }
}

impl Default for Mat4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5
    }

    #[test]
    fn test_identity_transform() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat4x4::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn test_quat_rotation_about_z() {
        // 90 degrees about +Z takes +X to +Y
        let half = std::f32::consts::FRAC_PI_4;
        let q = Quat::new(0.0, 0.0, half.sin(), half.cos());
        let rotated = Mat4x4::from_quat(q).transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(rotated, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_scale_rotate_translate_order() {
        // Scale by 2, rotate 90 degrees about Z, then translate: the point
        // (1, 0, 0) must end up at (10, 2, 0), proving scale runs first.
        let half = std::f32::consts::FRAC_PI_4;
        let world = Mat4x4::from_scale(Vec3::new(2.0, 2.0, 2.0))
            .mul(&Mat4x4::from_quat(Quat::new(0.0, 0.0, half.sin(), half.cos())))
            .mul(&Mat4x4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

        let p = world.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(10.0, 2.0, 0.0)));
        assert!(approx(world.translation(), Vec3::new(10.0, 0.0, 0.0)));
    }
}
