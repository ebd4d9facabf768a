//! The two on-disk transform encodings and their matrix forms.
//!
//! Bones and animation keys store a decomposed affine transform
//! ([`AffineParts`]); cameras and attach points store an axis/origin
//! frame ([`AxisFrame`]). Both convert to a homogeneous [`Mat4`] using
//! the source engine's composition conventions.

use std::io::{Read, Write};

use glam::{Mat4, Quat, Vec3};

use crate::error::Result;
use crate::io_ext::{ReadExt, WriteExt};

/// An orthonormal frame stored as three axis vectors plus an origin (48 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFrame {
    pub x_axis: [f32; 3],
    pub y_axis: [f32; 3],
    pub z_axis: [f32; 3],
    pub origin: [f32; 3],
}

impl AxisFrame {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            x_axis: reader.read_f32_triple()?,
            y_axis: reader.read_f32_triple()?,
            z_axis: reader.read_f32_triple()?,
            origin: reader.read_f32_triple()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_f32_triple(self.x_axis)?;
        writer.write_f32_triple(self.y_axis)?;
        writer.write_f32_triple(self.z_axis)?;
        writer.write_f32_triple(self.origin)?;
        Ok(())
    }

    /// Build the placement matrix: axes fill the rotation columns, the
    /// origin fills the translation column, bottom row is (0, 0, 0, 1).
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            Vec3::from(self.x_axis).extend(0.0),
            Vec3::from(self.y_axis).extend(0.0),
            Vec3::from(self.z_axis).extend(0.0),
            Vec3::from(self.origin).extend(1.0),
        )
    }
}

/// A decomposed affine transform (60 bytes on disk)
///
/// Stored field order: translation, rotation quaternion (x, y, z, w),
/// scale, scale-rotation quaternion, flip scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineParts {
    pub translation: [f32; 3],
    /// Rotation quaternion components in x, y, z, w order
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// Parsed and preserved but not folded into the matrix; the source
    /// engine's exporter emits it and its renderer ignores it.
    pub scale_rotation: [f32; 4],
    /// Negative values negate the rotation quaternion before conversion
    pub flip: f32,
}

impl AffineParts {
    /// The identity transform (unit quaternion, unit scale, no flip)
    pub const IDENTITY: Self = Self {
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
        scale_rotation: [0.0, 0.0, 0.0, 1.0],
        flip: 1.0,
    };

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            translation: reader.read_f32_triple()?,
            rotation: reader.read_f32_quad()?,
            scale: reader.read_f32_triple()?,
            scale_rotation: reader.read_f32_quad()?,
            flip: reader.read_f32_le()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_f32_triple(self.translation)?;
        writer.write_f32_quad(self.rotation)?;
        writer.write_f32_triple(self.scale)?;
        writer.write_f32_quad(self.scale_rotation)?;
        writer.write_f32_le(self.flip)?;
        Ok(())
    }

    /// Compose the parts as `Translation * Scale * Rotation`, matching the
    /// source engine's convention.
    pub fn to_mat4(&self) -> Mat4 {
        let [x, y, z, w] = self.rotation;
        let mut q = Quat::from_xyzw(x, y, z, w);
        if self.flip < 0.0 {
            q = -q;
        }

        Mat4::from_translation(Vec3::from(self.translation))
            * Mat4::from_scale(Vec3::from(self.scale))
            * Mat4::from_quat(q)
    }
}

impl Default for AffineParts {
    fn default() -> Self {
        Self::IDENTITY
    }
}
