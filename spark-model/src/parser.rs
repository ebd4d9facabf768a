//! The chunk-stream driver.
//!
//! Validates the file magic, then walks the chunk stream: known kinds
//! are dispatched to their decoders, unknown kinds are skipped using the
//! declared size and reported, and a zero-byte read at a header boundary
//! ends the stream cleanly.

use std::io::{Read, Write};

use log::{debug, warn};

use crate::chunks::{
    AnimationNodesChunk, AnimationsChunk, AttachPointsChunk, BlendParametersChunk, BonesChunk,
    CamerasChunk, Chunk, ChunkHeader, ChunkId, ExternalAnimationChunk, FaceSetsChunk,
    IndicesChunk, MaterialsChunk, SequencesChunk, VerticesChunk,
};
use crate::error::{MdlError, Result};
use crate::io_ext::ReadExt;

/// File magic: `MDL` followed by format version 7
pub const MDL_MAGIC: [u8; 4] = *b"MDL\x07";

/// An unknown chunk that was stepped over during parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedChunk {
    pub id: u32,
    pub size: u32,
}

/// One decoded chunk per kind.
///
/// A repeated chunk kind overwrites the earlier instance; last write
/// wins. That is a deliberate contract of the format, not an accident.
#[derive(Debug, Clone, Default)]
pub struct ChunkSet {
    pub vertices: Option<VerticesChunk>,
    pub indices: Option<IndicesChunk>,
    pub face_sets: Option<FaceSetsChunk>,
    pub materials: Option<MaterialsChunk>,
    pub bones: Option<BonesChunk>,
    pub animations: Option<AnimationsChunk>,
    pub animation_nodes: Option<AnimationNodesChunk>,
    pub sequences: Option<SequencesChunk>,
    pub blend_parameters: Option<BlendParametersChunk>,
    pub cameras: Option<CamerasChunk>,
    pub attach_points: Option<AttachPointsChunk>,
    pub external_animation: Option<ExternalAnimationChunk>,
    /// Unknown chunks encountered and skipped, in stream order
    pub skipped: Vec<SkippedChunk>,
}

impl ChunkSet {
    /// Store a decoded chunk, replacing any earlier chunk of the same kind
    pub fn insert(&mut self, chunk: Chunk) {
        match chunk {
            Chunk::Vertices(c) => self.vertices = Some(c),
            Chunk::Indices(c) => self.indices = Some(c),
            Chunk::FaceSets(c) => self.face_sets = Some(c),
            Chunk::Materials(c) => self.materials = Some(c),
            Chunk::Bones(c) => self.bones = Some(c),
            Chunk::Animations(c) => self.animations = Some(c),
            Chunk::AnimationNodes(c) => self.animation_nodes = Some(c),
            Chunk::Sequences(c) => self.sequences = Some(c),
            Chunk::BlendParameters(c) => self.blend_parameters = Some(c),
            Chunk::Cameras(c) => self.cameras = Some(c),
            Chunk::AttachPoints(c) => self.attach_points = Some(c),
            Chunk::ExternalAnimation(c) => self.external_animation = Some(c),
        }
    }
}

/// Validate the magic and read every chunk until end of stream
pub fn parse<R: Read>(reader: &mut R) -> Result<ChunkSet> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MDL_MAGIC {
        return Err(MdlError::InvalidMagic {
            expected: MDL_MAGIC,
            found: magic,
        });
    }

    read_chunks(reader)
}

/// Drive the chunk loop on a stream positioned just past the magic
pub fn read_chunks<R: Read>(reader: &mut R) -> Result<ChunkSet> {
    let mut set = ChunkSet::default();

    while let Some(header) = ChunkHeader::read(reader)? {
        match ChunkId::from_u32(header.id) {
            Some(id) => {
                debug!("reading chunk {:?}, declared size {}", id, header.size);
                set.insert(Chunk::read(id, reader)?);
            }
            None => {
                warn!("skipping unknown chunk id {} ({} bytes)", header.id, header.size);
                reader.skip_bytes(u64::from(header.size))?;
                set.skipped.push(SkippedChunk {
                    id: header.id,
                    size: header.size,
                });
            }
        }
    }

    Ok(set)
}

/// Write one chunk with its header, computing the declared size
pub fn write_chunk<W: Write>(writer: &mut W, chunk: &Chunk) -> Result<()> {
    let mut payload = Vec::new();
    chunk.write(&mut payload)?;

    ChunkHeader {
        id: chunk.id() as u32,
        size: payload.len() as u32,
    }
    .write(writer)?;
    writer.write_all(&payload)?;
    Ok(())
}

/// Write a complete model stream: magic followed by the given chunks
pub fn write_model<W: Write>(writer: &mut W, chunks: &[Chunk]) -> Result<()> {
    writer.write_all(&MDL_MAGIC)?;
    for chunk in chunks {
        write_chunk(writer, chunk)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::MdlBone;
    use crate::transform::AffineParts;
    use std::io::Cursor;

    fn bones_chunk(names: &[&str]) -> BonesChunk {
        BonesChunk {
            bones: names
                .iter()
                .enumerate()
                .map(|(i, name)| MdlBone {
                    name: (*name).to_string(),
                    parent: i as i32 - 1,
                    transform: AffineParts::IDENTITY,
                })
                .collect(),
        }
    }

    #[test]
    fn test_bad_magic_rejected() {
        let err = parse(&mut Cursor::new(b"MDL\x06rest".to_vec())).unwrap_err();
        assert!(matches!(err, MdlError::InvalidMagic { .. }));
    }

    #[test]
    fn test_empty_stream_after_magic() {
        let set = parse(&mut Cursor::new(MDL_MAGIC.to_vec())).unwrap();
        assert!(set.bones.is_none());
        assert!(set.skipped.is_empty());
    }

    #[test]
    fn test_unknown_chunk_skipped_exactly() {
        let mut data = Vec::new();
        data.extend_from_slice(&MDL_MAGIC);

        // Unknown chunk id 42 with a 5-byte payload
        data.extend_from_slice(&42u32.to_le_bytes());
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(&[0xAA; 5]);

        // Followed by a valid bones chunk
        write_chunk(
            &mut data,
            &Chunk::Bones(bones_chunk(&["root", "child"])),
        )
        .unwrap();

        let set = parse(&mut Cursor::new(data)).unwrap();
        assert_eq!(set.skipped, vec![SkippedChunk { id: 42, size: 5 }]);

        let bones = set.bones.unwrap();
        assert_eq!(bones.bones.len(), 2);
        assert_eq!(bones.bones[0].name, "root");
    }

    #[test]
    fn test_duplicate_chunk_last_wins() {
        let mut data = Vec::new();
        data.extend_from_slice(&MDL_MAGIC);
        write_chunk(&mut data, &Chunk::Bones(bones_chunk(&["first"]))).unwrap();
        write_chunk(&mut data, &Chunk::Bones(bones_chunk(&["second"]))).unwrap();

        let set = parse(&mut Cursor::new(data)).unwrap();
        let bones = set.bones.unwrap();
        assert_eq!(bones.bones.len(), 1);
        assert_eq!(bones.bones[0].name, "second");
    }

    #[test]
    fn test_truncated_header_is_error() {
        let mut data = Vec::new();
        data.extend_from_slice(&MDL_MAGIC);
        data.extend_from_slice(&[1u8, 0, 0]); // 3 bytes of an 8-byte header

        let err = parse(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, MdlError::UnexpectedEof));
    }
}
