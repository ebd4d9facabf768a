//! Index, face-set and material chunks (ids 2, 3 and 4).

use std::io::{Read, Write};

use crate::error::{MdlError, Result};
use crate::io_ext::{ReadExt, WriteExt};

/// Indices chunk: a flat count-prefixed list of `u32` vertex indices,
/// three per triangle
#[derive(Debug, Clone, Default)]
pub struct IndicesChunk {
    pub triangles: Vec<[u32; 3]>,
}

impl IndicesChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        if count % 3 != 0 {
            return Err(MdlError::ParseError(format!(
                "index count {count} is not a multiple of 3"
            )));
        }

        let mut triangles = Vec::with_capacity((count / 3).min(0x10000));
        for _ in 0..count / 3 {
            triangles.push([
                reader.read_u32_le()?,
                reader.read_u32_le()?,
                reader.read_u32_le()?,
            ]);
        }
        Ok(Self { triangles })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le((self.triangles.len() * 3) as u32)?;
        for tri in &self.triangles {
            for &index in tri {
                writer.write_u32_le(index)?;
            }
        }
        Ok(())
    }
}

/// A contiguous run of triangles sharing a material and a local bone list.
///
/// Vertex weight slots of vertices owned by this set index into `bones`,
/// which in turn holds indices into the model's global bone list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MdlFaceSet {
    pub material: u32,
    pub first_face: u32,
    pub face_count: u32,
    pub bones: Vec<u32>,
}

impl MdlFaceSet {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let material = reader.read_u32_le()?;
        let first_face = reader.read_u32_le()?;
        let face_count = reader.read_u32_le()?;
        let bone_count = reader.read_u32_le()? as usize;

        let mut bones = Vec::with_capacity(bone_count.min(0x10000));
        for _ in 0..bone_count {
            bones.push(reader.read_u32_le()?);
        }

        Ok(Self {
            material,
            first_face,
            face_count,
            bones,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.material)?;
        writer.write_u32_le(self.first_face)?;
        writer.write_u32_le(self.face_count)?;
        writer.write_u32_le(self.bones.len() as u32)?;
        for &bone in &self.bones {
            writer.write_u32_le(bone)?;
        }
        Ok(())
    }
}

/// Face-sets chunk: a count-prefixed array of face sets
#[derive(Debug, Clone, Default)]
pub struct FaceSetsChunk {
    pub face_sets: Vec<MdlFaceSet>,
}

impl FaceSetsChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut face_sets = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            face_sets.push(MdlFaceSet::read(reader)?);
        }
        Ok(Self { face_sets })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.face_sets.len() as u32)?;
        for set in &self.face_sets {
            set.write(writer)?;
        }
        Ok(())
    }
}

/// Materials chunk: material file paths, one per material index
#[derive(Debug, Clone, Default)]
pub struct MaterialsChunk {
    pub names: Vec<String>,
}

impl MaterialsChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut names = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            names.push(reader.read_len_string()?);
        }
        Ok(Self { names })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.names.len() as u32)?;
        for name in &self.names {
            writer.write_len_string(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_indices_flat_count() {
        let mut data = Vec::new();
        data.extend_from_slice(&6u32.to_le_bytes());
        for i in 0u32..6 {
            data.extend_from_slice(&i.to_le_bytes());
        }

        let chunk = IndicesChunk::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(chunk.triangles, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn test_indices_reject_ragged_count() {
        let mut data = Vec::new();
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 16]);

        let err = IndicesChunk::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, MdlError::ParseError(_)));
    }

    #[test]
    fn test_face_set_round_trip() {
        let set = MdlFaceSet {
            material: 1,
            first_face: 10,
            face_count: 20,
            bones: vec![4, 7, 2],
        };

        let mut data = Vec::new();
        set.write(&mut data).unwrap();
        let read_back = MdlFaceSet::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(read_back, set);
    }

    #[test]
    fn test_materials_round_trip() {
        let chunk = MaterialsChunk {
            names: vec!["models/alien/skulk.material".to_string(), String::new()],
        };

        let mut data = Vec::new();
        chunk.write(&mut data).unwrap();
        let read_back = MaterialsChunk::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(read_back.names, chunk.names);
    }
}
