//! Small vector/matrix types for agent position and orientation.
//!
//! Just enough linear algebra for a 3D ABM: translation along local axes
//! and a look-at style orientation. Not a general math library.

use core::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, b: Vec3) -> f64 {
        self.x * b.x + self.y * b.y + self.z * b.z
    }

    pub fn cross(self, b: Vec3) -> Vec3 {
        Vec3::new(
            self.y * b.z - self.z * b.y,
            self.z * b.x - self.x * b.z,
            self.x * b.y - self.y * b.x,
        )
    }

    pub fn length(self) -> f64 {
        let d2 = self.dot(self);
        if d2 <= 0.0 {
            // Guard against underflow on near-coincident points.
            0.0
        } else {
            d2.sqrt()
        }
    }

    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f64::EPSILON {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    pub fn distance(self, b: Vec3) -> f64 {
        (self - b).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, b: Vec3) -> Vec3 {
        Vec3::new(self.x + b.x, self.y + b.y, self.z + b.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, b: Vec3) -> Vec3 {
        Vec3::new(self.x - b.x, self.y - b.y, self.z - b.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Column-major 4x4 transform; `m[3]` is the translation column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Self {
        let mut m = [[0.0; 4]; 4];
        m[0][0] = 1.0;
        m[1][1] = 1.0;
        m[2][2] = 1.0;
        m[3][3] = 1.0;
        Self { m }
    }

    pub fn translation(self) -> Vec3 {
        Vec3::new(self.m[3][0], self.m[3][1], self.m[3][2])
    }

    pub fn set_translation(&mut self, p: Vec3) {
        self.m[3][0] = p.x;
        self.m[3][1] = p.y;
        self.m[3][2] = p.z;
    }

    /// Translate along the matrix's own basis vectors by `v`, returning a
    /// new matrix. This is how an agent moves in its local frame.
    pub fn translated(self, v: Vec3) -> Mat4 {
        let mut out = self;
        out.m[3][0] = self.m[0][0] * v.x + self.m[1][0] * v.y + self.m[2][0] * v.z + self.m[3][0];
        out.m[3][1] = self.m[0][1] * v.x + self.m[1][1] * v.y + self.m[2][1] * v.z + self.m[3][1];
        out.m[3][2] = self.m[0][2] * v.x + self.m[1][2] * v.y + self.m[2][2] * v.z + self.m[3][2];
        out
    }

    /// Orientation looking from `eye` toward `target`, up = +z, with the
    /// translation column kept at `eye`. Transposed look-at: rows are the
    /// side/up/back basis of the viewer.
    pub fn look_at(eye: Vec3, target: Vec3) -> Mat4 {
        let f = (target - eye).normalized();
        let s = f.cross(Vec3::new(0.0, 0.0, 1.0)).normalized();
        let u = s.cross(f);

        let mut out = Mat4::identity();
        out.m[0][0] = s.x;
        out.m[0][1] = s.y;
        out.m[0][2] = s.z;
        out.m[1][0] = u.x;
        out.m[1][1] = u.y;
        out.m[1][2] = u.z;
        out.m[2][0] = -f.x;
        out.m[2][1] = -f.y;
        out.m[2][2] = -f.z;
        out.set_translation(eye);
        out
    }
}
