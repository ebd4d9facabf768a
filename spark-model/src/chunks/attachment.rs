//! Attach-point chunk (id 13).

use std::io::{Read, Write};

use crate::error::Result;
use crate::io_ext::{ReadExt, WriteExt};
use crate::transform::AxisFrame;

/// A named attachment point anchored to a bone (weapon sockets, effect
/// emitters and the like)
#[derive(Debug, Clone, PartialEq)]
pub struct MdlAttachPoint {
    pub name: String,
    /// Owning bone index
    pub bone: u32,
    /// Placement relative to the owning bone
    pub frame: AxisFrame,
}

impl MdlAttachPoint {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let name = reader.read_len_string()?;
        let bone = reader.read_u32_le()?;
        let frame = AxisFrame::read(reader)?;
        Ok(Self { name, bone, frame })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_len_string(&self.name)?;
        writer.write_u32_le(self.bone)?;
        self.frame.write(writer)?;
        Ok(())
    }
}

/// Attach-points chunk: a count-prefixed array of attach points
#[derive(Debug, Clone, Default)]
pub struct AttachPointsChunk {
    pub attach_points: Vec<MdlAttachPoint>,
}

impl AttachPointsChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut attach_points = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            attach_points.push(MdlAttachPoint::read(reader)?);
        }
        Ok(Self { attach_points })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.attach_points.len() as u32)?;
        for attach_point in &self.attach_points {
            attach_point.write(writer)?;
        }
        Ok(())
    }
}
