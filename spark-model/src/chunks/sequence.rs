//! Sequence and blend-parameter chunks (ids 9 and 10).

use std::io::{Read, Write};

use crate::error::Result;
use crate::io_ext::{ReadExt, WriteExt};

/// A named entry point into the animation graph
#[derive(Debug, Clone, PartialEq)]
pub struct MdlSequence {
    pub name: String,
    /// Index into the animation-nodes chunk
    pub node: u32,
    /// Playback length in seconds
    pub length: f32,
}

impl MdlSequence {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let name = reader.read_len_string()?;
        let node = reader.read_u32_le()?;
        let length = reader.read_f32_le()?;
        Ok(Self { name, node, length })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_len_string(&self.name)?;
        writer.write_u32_le(self.node)?;
        writer.write_f32_le(self.length)?;
        Ok(())
    }
}

/// Sequences chunk: a count-prefixed array of sequences
#[derive(Debug, Clone, Default)]
pub struct SequencesChunk {
    pub sequences: Vec<MdlSequence>,
}

impl SequencesChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut sequences = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            sequences.push(MdlSequence::read(reader)?);
        }
        Ok(Self { sequences })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.sequences.len() as u32)?;
        for sequence in &self.sequences {
            sequence.write(writer)?;
        }
        Ok(())
    }
}

/// Blend-parameter names chunk: one name per blend parameter index
#[derive(Debug, Clone, Default)]
pub struct BlendParametersChunk {
    pub names: Vec<String>,
}

impl BlendParametersChunk {
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
