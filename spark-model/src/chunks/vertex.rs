//! Vertex chunk (id 1): 92-byte fixed records.

use std::io::{Read, Write};

use glam::{Vec2, Vec3};

use crate::error::Result;
use crate::io_ext::{ReadExt, WriteExt};

/// One of a vertex's four skinning slots.
///
/// `bone` is a slot into the bone list of the face set that owns the
/// triangle containing this vertex, not a global bone index. A weight of
/// zero marks an unused slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MdlVertexWeight {
    pub weight: f32,
    pub bone: u32,
}

impl MdlVertexWeight {
    /// Whether this slot contributes to skinning
    pub fn is_active(&self) -> bool {
        self.weight > 0.0
    }
}

/// A single model vertex as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MdlVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub binormal: Vec3,
    /// Raw texture coordinates; V is not flipped here, presentation-space
    /// conventions belong to the consumer
    pub tex_coords: Vec2,
    /// Field between the UVs and the weight slots. Purpose unknown;
    /// preserved so written files match byte for byte.
    pub unknown: u32,
    pub weights: [MdlVertexWeight; 4],
}

impl MdlVertex {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let position = Vec3::from(reader.read_f32_triple()?);
        let normal = Vec3::from(reader.read_f32_triple()?);
        let tangent = Vec3::from(reader.read_f32_triple()?);
        let binormal = Vec3::from(reader.read_f32_triple()?);
        let tex_coords = Vec2::from(reader.read_f32_pair()?);
        let unknown = reader.read_u32_le()?;

        let mut weights = [MdlVertexWeight::default(); 4];
        for slot in &mut weights {
            slot.weight = reader.read_f32_le()?;
            slot.bone = reader.read_u32_le()?;
        }

        Ok(Self {
            position,
            normal,
            tangent,
            binormal,
            tex_coords,
            unknown,
            weights,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_f32_triple(self.position.into())?;
        writer.write_f32_triple(self.normal.into())?;
        writer.write_f32_triple(self.tangent.into())?;
        writer.write_f32_triple(self.binormal.into())?;
        writer.write_f32_pair(self.tex_coords.into())?;
        writer.write_u32_le(self.unknown)?;
        for slot in &self.weights {
            writer.write_f32_le(slot.weight)?;
            writer.write_u32_le(slot.bone)?;
        }
        Ok(())
    }

    /// Weight slots that actually contribute (weight > 0)
    pub fn active_weights(&self) -> impl Iterator<Item = &MdlVertexWeight> {
        self.weights.iter().filter(|w| w.is_active())
    }
}

/// Vertices chunk: a count-prefixed array of vertex records
#[derive(Debug, Clone, Default)]
pub struct VerticesChunk {
    pub vertices: Vec<MdlVertex>,
}

impl VerticesChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut vertices = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            vertices.push(MdlVertex::read(reader)?);
        }
        Ok(Self { vertices })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.vertices.len() as u32)?;
        for vertex in &self.vertices {
            vertex.write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_vertex_record_size() {
        let mut data = Vec::new();
        MdlVertex::default().write(&mut data).unwrap();
        assert_eq!(data.len(), 92);
    }

    #[test]
    fn test_vertex_round_trip() {
        let vertex = MdlVertex {
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Z,
            tangent: Vec3::X,
            binormal: Vec3::Y,
            tex_coords: Vec2::new(0.25, 0.75),
            unknown: 7,
            weights: [
                MdlVertexWeight { weight: 0.7, bone: 2 },
                MdlVertexWeight { weight: 0.3, bone: 1 },
                MdlVertexWeight::default(),
                MdlVertexWeight::default(),
            ],
        };

        let mut data = Vec::new();
        vertex.write(&mut data).unwrap();
        let read_back = MdlVertex::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(read_back, vertex);
    }

    #[test]
    fn test_active_weights_filter_zero() {
        let vertex = MdlVertex {
            weights: [
                MdlVertexWeight { weight: 0.7, bone: 2 },
                MdlVertexWeight { weight: 0.0, bone: 5 },
                MdlVertexWeight { weight: 0.3, bone: 1 },
                MdlVertexWeight { weight: 0.0, bone: 0 },
            ],
            ..MdlVertex::default()
        };

        let active: Vec<_> = vertex.active_weights().collect();
        assert_eq!(active.len(), 2);
        assert_eq!((active[0].bone, active[0].weight), (2, 0.7));
        assert_eq!((active[1].bone, active[1].weight), (1, 0.3));
    }

    #[test]
    fn test_truncated_vertex_is_eof() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 40]); // less than one full record

        let err = VerticesChunk::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, crate::MdlError::UnexpectedEof));
    }
}
