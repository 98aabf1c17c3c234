//! Node transformation data.
//!
//! A node's local transform is stored as position, Euler rotation and scale.
//! Keeping the Euler angles (rather than a quaternion) lets actuators write a
//! single axis, e.g. the roll of a wheel, without disturbing the other axes.

use std::ops::Mul;

use cgmath::{Quaternion, Rad, Rotation3};

/// The order in which the three Euler rotations are composed.
///
/// `Xyz` is the default for every node. Steerable wheels use `Yxz` so the
/// steering yaw is applied before the rolling pitch and the two don't tilt
/// each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationOrder {
    #[default]
    Xyz,
    Yxz,
}

/// Per-node transformation: position, Euler rotation (radians) and scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Vector3<f32>,
    pub order: RotationOrder,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Create a new instance with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Vector3::new(0.0, 0.0, 0.0),
            order: RotationOrder::Xyz,
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Build an instance from a decomposed glTF transform.
    pub fn from_trs(
        position: [f32; 3],
        rotation: cgmath::Quaternion<f32>,
        scale: [f32; 3],
    ) -> Self {
        Self {
            position: position.into(),
            rotation: euler_xyz(rotation),
            order: RotationOrder::Xyz,
            scale: scale.into(),
        }
    }

    /// The rotation as a quaternion, composed in `self.order`.
    pub fn quaternion(&self) -> cgmath::Quaternion<f32> {
        let x = Quaternion::from_angle_x(Rad(self.rotation.x));
        let y = Quaternion::from_angle_y(Rad(self.rotation.y));
        let z = Quaternion::from_angle_z(Rad(self.rotation.z));
        match self.order {
            RotationOrder::Xyz => x * y * z,
            RotationOrder::Yxz => y * x * z,
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.quaternion())
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Extract XYZ-ordered Euler angles from a unit quaternion.
fn euler_xyz(q: cgmath::Quaternion<f32>) -> cgmath::Vector3<f32> {
    let m = cgmath::Matrix3::from(q);
    // cgmath matrices are column-major: m[col][row]
    let (m11, m12, m13) = (m[0][0], m[1][0], m[2][0]);
    let (m22, m23) = (m[1][1], m[2][1]);
    let (m32, m33) = (m[1][2], m[2][2]);
    let y = m13.clamp(-1.0, 1.0).asin();
    if m13.abs() < 0.999_999 {
        cgmath::Vector3::new((-m23).atan2(m33), y, (-m12).atan2(m11))
    } else {
        cgmath::Vector3::new(m32.atan2(m22), y, 0.0)
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    /// Composes a parent (`self`) with a child transform into the child's world transform.
    fn mul(self, rhs: &'b Instance) -> Self::Output {
        let parent_rotation = self.quaternion();
        let new_rotation = parent_rotation * rhs.quaternion();

        let new_scale = cgmath::Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let scaled_rhs_pos = cgmath::Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        let new_position = self.position + (parent_rotation * scaled_rhs_pos);

        Instance {
            position: new_position,
            rotation: euler_xyz(new_rotation),
            order: RotationOrder::Xyz,
            scale: new_scale,
        }
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        &self * &rhs
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}
