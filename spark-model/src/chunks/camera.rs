//! Camera chunk (id 11).

use std::io::{Read, Write};

use crate::error::Result;
use crate::io_ext::{ReadExt, WriteExt};
use crate::transform::AxisFrame;

/// A camera anchored to a bone
#[derive(Debug, Clone, PartialEq)]
pub struct MdlCamera {
    pub name: String,
    /// Owning bone index
    pub bone: u32,
    /// Horizontal field of view in radians
    pub fov: f32,
    /// Placement relative to the owning bone
    pub frame: AxisFrame,
}

impl MdlCamera {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let name = reader.read_len_string()?;
        let bone = reader.read_u32_le()?;
        let fov = reader.read_f32_le()?;
        let frame = AxisFrame::read(reader)?;
        Ok(Self {
            name,
            bone,
            fov,
            frame,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_len_string(&self.name)?;
        writer.write_u32_le(self.bone)?;
        writer.write_f32_le(self.fov)?;
        self.frame.write(writer)?;
        Ok(())
    }
}

/// Cameras chunk: a count-prefixed array of cameras
#[derive(Debug, Clone, Default)]
pub struct CamerasChunk {
    pub cameras: Vec<MdlCamera>,
}

impl CamerasChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut cameras = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            cameras.push(MdlCamera::read(reader)?);
        }
        Ok(Self { cameras })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.cameras.len() as u32)?;
        for camera in &self.cameras {
            camera.write(writer)?;
        }
        Ok(())
    }
}
