//! Animation chunks (ids 7 and 19).
//!
//! An animation carries an optional compressed per-bone curve set and a
//! dense per-bone array of decomposed transforms, one per key. Playback
//! uses only the dense form; the compressed curves are decoded for byte
//! accuracy and kept inert.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use crate::error::Result;
use crate::io_ext::{ReadExt, WriteExt};
use crate::transform::AffineParts;

/// A sparse keyframe table: parallel time and value arrays.
///
/// On disk all times come first, then all values (structure of arrays).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseTrack<T> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
}

impl<T> SparseTrack<T> {
    fn read<R, F>(reader: &mut R, read_value: F) -> Result<Self>
    where
        R: Read,
        F: Fn(&mut R) -> io::Result<T>,
    {
        let count = reader.read_u32_le()? as usize;
        let mut times = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            times.push(reader.read_f32_le()?);
        }
        let mut values = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            values.push(read_value(reader)?);
        }
        Ok(Self { times, values })
    }

    fn write<W, F>(&self, writer: &mut W, write_value: F) -> Result<()>
    where
        W: Write,
        F: Fn(&mut W, &T) -> io::Result<()>,
    {
        writer.write_u32_le(self.times.len() as u32)?;
        for &time in &self.times {
            writer.write_f32_le(time)?;
        }
        for value in &self.values {
            write_value(writer, value)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Compressed per-bone curve set: five independently keyed sparse tracks
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MdlAnimationCurve {
    pub position: SparseTrack<[f32; 3]>,
    pub scale: SparseTrack<[f32; 3]>,
    pub flip: SparseTrack<f32>,
    pub rotation: SparseTrack<[f32; 4]>,
    pub rotation_scale: SparseTrack<[f32; 4]>,
}

impl MdlAnimationCurve {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            position: SparseTrack::read(reader, ReadExt::read_f32_triple)?,
            scale: SparseTrack::read(reader, ReadExt::read_f32_triple)?,
            flip: SparseTrack::read(reader, ReadExt::read_f32_le)?,
            rotation: SparseTrack::read(reader, ReadExt::read_f32_quad)?,
            rotation_scale: SparseTrack::read(reader, ReadExt::read_f32_quad)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.position.write(writer, |w, v| w.write_f32_triple(*v))?;
        self.scale.write(writer, |w, v| w.write_f32_triple(*v))?;
        self.flip.write(writer, |w, v| w.write_f32_le(*v))?;
        self.rotation.write(writer, |w, v| w.write_f32_quad(*v))?;
        self.rotation_scale.write(writer, |w, v| w.write_f32_quad(*v))?;
        Ok(())
    }
}

/// A single animation: dense per-bone keys plus optional compressed curves
#[derive(Debug, Clone, Default)]
pub struct MdlAnimation {
    pub flags: u32,
    pub key_count: u32,
    pub duration: f32,
    /// Compressed curve sets, present only when the on-disk flag is set.
    /// Decoded for stream accuracy; playback uses `keys`.
    pub curves: Option<Vec<MdlAnimationCurve>>,
    /// Bone index (into the same file's bone chunk) to `key_count`
    /// decomposed transforms
    pub keys: BTreeMap<u32, Vec<AffineParts>>,
    /// Frame index to label
    pub frame_tags: BTreeMap<u32, String>,
}

impl MdlAnimation {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let flags = reader.read_u32_le()?;
        let key_count = reader.read_u32_le()?;
        let duration = reader.read_f32_le()?;
        let compressed = reader.read_u32_le()?;

        let curves = if compressed != 0 {
            let count = reader.read_u32_le()? as usize;
            let mut curves = Vec::with_capacity(count.min(0x10000));
            for _ in 0..count {
                curves.push(MdlAnimationCurve::read(reader)?);
            }
            Some(curves)
        } else {
            None
        };

        let mut keys = BTreeMap::new();
        let bone_count = reader.read_u32_le()?;
        for _ in 0..bone_count {
            let bone = reader.read_u32_le()?;
            let mut transforms = Vec::with_capacity(key_count.min(0x10000) as usize);
            for _ in 0..key_count {
                transforms.push(AffineParts::read(reader)?);
            }
            // Last write wins on duplicate bone entries
            keys.insert(bone, transforms);
        }

        let mut frame_tags = BTreeMap::new();
        let tag_count = reader.read_u32_le()?;
        for _ in 0..tag_count {
            let frame = reader.read_u32_le()?;
            let label = reader.read_len_string()?;
            frame_tags.insert(frame, label);
        }

        Ok(Self {
            flags,
            key_count,
            duration,
            curves,
            keys,
            frame_tags,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.flags)?;
        writer.write_u32_le(self.key_count)?;
        writer.write_f32_le(self.duration)?;
        writer.write_u32_le(u32::from(self.curves.is_some()))?;

        if let Some(curves) = &self.curves {
            writer.write_u32_le(curves.len() as u32)?;
            for curve in curves {
                curve.write(writer)?;
            }
        }

        writer.write_u32_le(self.keys.len() as u32)?;
        for (&bone, transforms) in &self.keys {
            writer.write_u32_le(bone)?;
            for transform in transforms {
                transform.write(writer)?;
            }
        }

        writer.write_u32_le(self.frame_tags.len() as u32)?;
        for (&frame, label) in &self.frame_tags {
            writer.write_u32_le(frame)?;
            writer.write_len_string(label)?;
        }
        Ok(())
    }
}

/// Animations chunk: a count-prefixed array of animations
#[derive(Debug, Clone, Default)]
pub struct AnimationsChunk {
    pub animations: Vec<MdlAnimation>,
}

impl AnimationsChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32_le()? as usize;
        let mut animations = Vec::with_capacity(count.min(0x10000));
        for _ in 0..count {
            animations.push(MdlAnimation::read(reader)?);
        }
        Ok(Self { animations })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32_le(self.animations.len() as u32)?;
        for animation in &self.animations {
            animation.write(writer)?;
        }
        Ok(())
    }
}

/// External animation reference chunk: a path to a second model file
/// whose animation chunks apply to this model's skeleton
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalAnimationChunk {
    pub path: String,
}

impl ExternalAnimationChunk {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            path: reader.read_len_string()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_len_string(&self.path)?;
        Ok(())
    }
}
