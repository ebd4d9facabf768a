//! Parser and scene-data reconstructor for Spark engine model files.
//!
//! A model file is the magic `MDL\x07` followed by a stream of sized
//! chunks carrying geometry, a bone hierarchy, decomposed-transform
//! animations, an animation graph, cameras and attach points. This crate
//! decodes the stream ([`parser::parse`]) and reconstructs renderable
//! data from it ([`Model`]): world matrices for every bone, per-frame
//! pose matrices for every animation, and per-vertex bone influences
//! resolved through the owning face set.
//!
//! ```no_run
//! use spark_model::Model;
//!
//! # fn main() -> spark_model::Result<()> {
//! let model = Model::load("units/grunt.mdl", None)?;
//! for bone in &model.skeleton.bones {
//!     println!("{} -> {:?}", bone.name, bone.parent);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunks;
pub mod error;
pub mod io_ext;
pub mod model;
pub mod parser;
pub mod transform;

pub use error::{MdlError, Result};
pub use model::{
    AnimationClip, AnimationSet, BoneInfluence, Geometry, Model, ModelAttachPoint, ModelCamera,
    ModelDiagnostic, Skeleton, SkeletonBone,
};
pub use parser::{ChunkSet, MDL_MAGIC, SkippedChunk};
pub use transform::{AffineParts, AxisFrame};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
