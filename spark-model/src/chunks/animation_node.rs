//! Animation-graph node chunk (id 8).

use std::io::{Read, Write};

use crate::error::{MdlError, Result};
use crate::io_ext::{ReadExt, WriteExt};

/// Numeric node-type tags as stored on disk
const NODE_ANIMATION: u32 = 1;
const NODE_BLEND: u32 = 2;
const NODE_LAYER: u32 = 3;

/// Variant payload of an animation-graph node
#[derive(Debug, Clone, PartialEq)]
pub enum MdlAnimationNodeKind {
    /// Plays a single animation
    Animation { animation: u32 },
    /// Blends between animations driven by a named blend parameter
    Blend {
        parameter: u32,
        min: f32,
        max: f32,
        animations: Vec<u32>,
    },
    /// Stacks animations in order
    Layer { animations: Vec<u32> },
}

/// A node in the animation graph
#[derive(Debug, Clone, PartialEq)]
pub struct MdlAnimationNode {
    pub flags: u32,
    pub kind: MdlAnimationNodeKind,
}

impl MdlAnimationNode {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let tag = reader.read_u32_le()?;
        let flags = reader.read_u32_le()?;

        let kind = match tag {
            NODE_ANIMATION => MdlAnimationNodeKind::Animation {
                animation: reader.read_u32_le()?,
            },
            NODE_BLEND => {
                let parameter = reader.read_u32_le()?;
                let min = reader.read_f32_le()?;
                let max = reader.read_f32_le()?;
                let count = reader.read_u32_le()? as usize;
                let mut animations = Vec::with_capacity(count.min(0x10000));
                for _ in 0..count {
                    animations.push(reader.read_u32_le()?);
                }
                MdlAnimationNodeKind::Blend {
                    parameter,
                    min,
                    max,
                    animations,
                }
            }
            NODE_LAYER => {
                let count = reader.read_u32_le()? as usize;
                let mut animations = Vec::with_capacity(count.min(0x10000));
                for _ in 0..count {
                    animations.push(reader.read_u32_le()?);
                }
                MdlAnimationNodeKind::Layer { animations }
            }
            other => {
                return Err(MdlError::ParseError(format!(
                    "unknown animation node type {other}"
                )));
            }
        };

        Ok(Self { flags, kind })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        match &self.kind {
            MdlAnimationNodeKind::Animation { animation } => {
                writer.write_u32_le(NODE_ANIMATION)?;
                writer.write_u32_le(self.flags)?;
                writer.write_u32_le(*animation)?;
            }
            MdlAnimationNodeKind::Blend {
                parameter,
                min,
                max,
                animations,
            } => {
                writer.write_u32_le(NODE_BLEND)?;
                writer.write_u32_le(self.flags)?;
                writer.write_u32_le(*parameter)?;
                writer.write_f32_le(*min)?;
                writer.write_f32_le(*max)?;
                writer.write_u32_le(animations.len() as u32)?;
                for &animation in animations {
                    writer.write_u32_le(animation)?;
                }
            }
            MdlAnimationNodeKind::Layer { animations } => {
                writer.write_u32_le(NODE_LAYER)?;
                writer.write_u32_le(self.flags)?;
                writer.write_u32_le(animations.len() as u32)?;
                for &animation in animations {
                    writer.write_u32_le(animation)?;
                }
            }
        }
        Ok(())
    }
}

/// Animation-nodes chunk: a count-prefixed array of graph nodes
#[derive(Debug, Clone, Default)]
pub struct AnimationNodesChunk {
    pub nodes: Vec<MdlAnimationNode>,
}

impl AnimationNodesChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut nodes = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            nodes.push(MdlAnimationNode::read(reader)?);
        }
        Ok(Self { nodes })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.nodes.len() as u32)?;
        for node in &self.nodes {
            node.write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_node_variants_round_trip() {
        let chunk = AnimationNodesChunk {
            nodes: vec![
                MdlAnimationNode {
                    flags: 0,
                    kind: MdlAnimationNodeKind::Animation { animation: 3 },
                },
                MdlAnimationNode {
                    flags: 1,
                    kind: MdlAnimationNodeKind::Blend {
                        parameter: 0,
                        min: 0.0,
                        max: 1.0,
                        animations: vec![1, 2],
                    },
                },
                MdlAnimationNode {
                    flags: 0,
                    kind: MdlAnimationNodeKind::Layer {
                        animations: vec![0, 1, 2],
                    },
                },
            ],
        };

        let mut data = Vec::new();
        chunk.write(&mut data).unwrap();
        let read_back = AnimationNodesChunk::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(read_back.nodes, chunk.nodes);
    }

    #[test]
    fn test_unknown_node_type_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(&9u32.to_le_bytes()); // bogus tag
        data.extend_from_slice(&0u32.to_le_bytes());

        let err = MdlAnimationNode::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, MdlError::ParseError(_)));
    }
}
