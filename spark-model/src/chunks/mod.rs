//! Chunk types and their decoders.
//!
//! A Spark model file is a magic tag followed by a stream of
//! `{u32 id, u32 size, payload}` chunks. Each recognized chunk kind has
//! a decoder that consumes exactly its payload; the declared size is
//! only needed to step over chunks this crate does not know about.

pub mod animation;
pub mod animation_node;
pub mod attachment;
pub mod bone;
pub mod camera;
pub mod geometry;
pub mod sequence;
pub mod vertex;

use std::io::{Read, Write};

use crate::error::{MdlError, Result};
use crate::io_ext::WriteExt;

pub use animation::{
    AnimationsChunk, ExternalAnimationChunk, MdlAnimation, MdlAnimationCurve, SparseTrack,
};
pub use animation_node::{AnimationNodesChunk, MdlAnimationNode, MdlAnimationNodeKind};
pub use attachment::{AttachPointsChunk, MdlAttachPoint};
pub use bone::{BonesChunk, MdlBone};
pub use camera::{CamerasChunk, MdlCamera};
pub use geometry::{FaceSetsChunk, IndicesChunk, MaterialsChunk, MdlFaceSet};
pub use sequence::{BlendParametersChunk, MdlSequence, SequencesChunk};
pub use vertex::{MdlVertex, MdlVertexWeight, VerticesChunk};

/// The closed set of chunk kinds this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ChunkId {
    Vertices = 1,
    Indices = 2,
    FaceSets = 3,
    Materials = 4,
    Bones = 6,
    Animations = 7,
    AnimationNodes = 8,
    Sequences = 9,
    BlendParameters = 10,
    Cameras = 11,
    AttachPoints = 13,
    ExternalAnimation = 19,
}

impl ChunkId {
    /// Map an on-disk id to a known chunk kind
    pub fn from_u32(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Vertices),
            2 => Some(Self::Indices),
            3 => Some(Self::FaceSets),
            4 => Some(Self::Materials),
            6 => Some(Self::Bones),
            7 => Some(Self::Animations),
            8 => Some(Self::AnimationNodes),
            9 => Some(Self::Sequences),
            10 => Some(Self::BlendParameters),
            11 => Some(Self::Cameras),
            13 => Some(Self::AttachPoints),
            19 => Some(Self::ExternalAnimation),
            _ => None,
        }
    }
}

/// An 8-byte chunk header: numeric kind id and declared payload size
#[derive(Debug, Clone, Copy)]
pub struct ChunkHeader {
    pub id: u32,
    pub size: u32,
}

impl ChunkHeader {
    /// Read a header, returning `None` at a clean end of stream.
    ///
    /// Zero bytes remaining at a header boundary is normal termination;
    /// a partial header is an error.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let mut buf = [0u8; 8];
        let mut filled = 0;
        while filled < buf.len() {
            let n = reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        match filled {
            0 => Ok(None),
            8 => {
                let id = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
                let size = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
                Ok(Some(Self { id, size }))
            }
            _ => Err(MdlError::UnexpectedEof),
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.id)?;
        writer.write_u32_le(self.size)?;
        Ok(())
    }
}

/// A decoded chunk, tagged by kind
#[derive(Debug, Clone)]
pub enum Chunk {
    Vertices(VerticesChunk),
    Indices(IndicesChunk),
    FaceSets(FaceSetsChunk),
    Materials(MaterialsChunk),
    Bones(BonesChunk),
    Animations(AnimationsChunk),
    AnimationNodes(AnimationNodesChunk),
    Sequences(SequencesChunk),
    BlendParameters(BlendParametersChunk),
    Cameras(CamerasChunk),
    AttachPoints(AttachPointsChunk),
    ExternalAnimation(ExternalAnimationChunk),
}

impl Chunk {
    /// Decode the payload for a known chunk kind.
    ///
    /// The decoder consumes exactly its own payload; the header's declared
    /// size is not re-validated for recognized chunks.
    pub fn read<R: Read>(id: ChunkId, reader: &mut R) -> Result<Self> {
        Ok(match id {
            ChunkId::Vertices => Self::Vertices(VerticesChunk::read(reader)?),
            ChunkId::Indices => Self::Indices(IndicesChunk::read(reader)?),
            ChunkId::FaceSets => Self::FaceSets(FaceSetsChunk::read(reader)?),
            ChunkId::Materials => Self::Materials(MaterialsChunk::read(reader)?),
            ChunkId::Bones => Self::Bones(BonesChunk::read(reader)?),
            ChunkId::Animations => Self::Animations(AnimationsChunk::read(reader)?),
            ChunkId::AnimationNodes => {
                Self::AnimationNodes(AnimationNodesChunk::read(reader)?)
            }
            ChunkId::Sequences => Self::Sequences(SequencesChunk::read(reader)?),
            ChunkId::BlendParameters => {
                Self::BlendParameters(BlendParametersChunk::read(reader)?)
            }
            ChunkId::Cameras => Self::Cameras(CamerasChunk::read(reader)?),
            ChunkId::AttachPoints => Self::AttachPoints(AttachPointsChunk::read(reader)?),
            ChunkId::ExternalAnimation => {
                Self::ExternalAnimation(ExternalAnimationChunk::read(reader)?)
            }
        })
    }

    /// Write this chunk's payload (without the header)
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::Vertices(c) => c.write(writer),
            Self::Indices(c) => c.write(writer),
            Self::FaceSets(c) => c.write(writer),
            Self::Materials(c) => c.write(writer),
            Self::Bones(c) => c.write(writer),
            Self::Animations(c) => c.write(writer),
            Self::AnimationNodes(c) => c.write(writer),
            Self::Sequences(c) => c.write(writer),
            Self::BlendParameters(c) => c.write(writer),
            Self::Cameras(c) => c.write(writer),
            Self::AttachPoints(c) => c.write(writer),
            Self::ExternalAnimation(c) => c.write(writer),
        }
    }

    /// The kind tag this chunk is written under
    pub fn id(&self) -> ChunkId {
        match self {
            Self::Vertices(_) => ChunkId::Vertices,
            Self::Indices(_) => ChunkId::Indices,
            Self::FaceSets(_) => ChunkId::FaceSets,
            Self::Materials(_) => ChunkId::Materials,
            Self::Bones(_) => ChunkId::Bones,
            Self::Animations(_) => ChunkId::Animations,
            Self::AnimationNodes(_) => ChunkId::AnimationNodes,
            Self::Sequences(_) => ChunkId::Sequences,
            Self::BlendParameters(_) => ChunkId::BlendParameters,
            Self::Cameras(_) => ChunkId::Cameras,
            Self::AttachPoints(_) => ChunkId::AttachPoints,
            Self::ExternalAnimation(_) => ChunkId::ExternalAnimation,
        }
    }
}
