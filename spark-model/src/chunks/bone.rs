//! Bone chunk (id 6).

use std::io::{Read, Write};

use crate::error::Result;
use crate::io_ext::{ReadExt, WriteExt};
use crate::transform::AffineParts;

/// A bone in the model's skeleton
///
/// `parent` is a signed index into the bone list; -1 marks a root. Well
/// formed files declare parents before children (parent index < own
/// index), which is what makes single-pass hierarchy resolution possible.
#[derive(Debug, Clone, PartialEq)]
pub struct MdlBone {
    pub name: String,
    pub parent: i32,
    pub transform: AffineParts,
}

impl MdlBone {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let name = reader.read_len_string()?;
        let parent = reader.read_i32_le()?;
        let transform = AffineParts::read(reader)?;
        Ok(Self {
            name,
            parent,
            transform,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_len_string(&self.name)?;
        writer.write_i32_le(self.parent)?;
        self.transform.write(writer)?;
        Ok(())
    }

    pub fn is_root(&self) -> bool {
        self.parent < 0
    }
}

/// Bones chunk: a count-prefixed array of bones in declaration order
#[derive(Debug, Clone, Default)]
pub struct BonesChunk {
    pub bones: Vec<MdlBone>,
}

impl BonesChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut bones = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            bones.push(MdlBone::read(reader)?);
        }
        Ok(Self { bones })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.bones.len() as u32)?;
        for bone in &self.bones {
            bone.write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_bone_round_trip() {
        let bone = MdlBone {
            name: "spine_01".to_string(),
            parent: -1,
            transform: AffineParts {
                translation: [0.0, 1.5, 0.0],
                ..AffineParts::IDENTITY
            },
        };

        let mut data = Vec::new();
        bone.write(&mut data).unwrap();
        let read_back = MdlBone::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(read_back, bone);
        assert!(read_back.is_root());
    }

    #[test]
    fn test_bones_chunk_order_preserved() {
        let chunk = BonesChunk {
            bones: vec![
                MdlBone {
                    name: "root".to_string(),
                    parent: -1,
                    transform: AffineParts::IDENTITY,
                },
                MdlBone {
                    name: "child".to_string(),
                    parent: 0,
                    transform: AffineParts::IDENTITY,
                },
            ],
        };

        let mut data = Vec::new();
        chunk.write(&mut data).unwrap();
        let read_back = BonesChunk::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(read_back.bones.len(), 2);
        assert_eq!(read_back.bones[0].name, "root");
        assert_eq!(read_back.bones[1].parent, 0);
    }
}
