//! Reconstruction of renderable data from a decoded chunk set.
//!
//! [`Model::from_chunks`] is a pure function of its inputs: it derives
//! the skeleton hierarchy with resolved world matrices, per-frame pose
//! matrices for every animation, and per-vertex bone influences resolved
//! through the owning face set. [`Model::load`] adds the filesystem
//! conveniences on top, including the external animation file flow.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use glam::Mat4;
use log::warn;

use crate::chunks::{MdlAnimationNodeKind, MdlFaceSet, MdlVertex};
use crate::error::{MdlError, Result};
use crate::parser::{self, ChunkSet};
use crate::transform::AffineParts;

/// A resolved skinning assignment: global bone index and weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfluence {
    pub bone: u32,
    pub weight: f32,
}

/// Renderable geometry with skinning data resolved to global bone indices
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub vertices: Vec<MdlVertex>,
    pub triangles: Vec<[u32; 3]>,
    pub face_sets: Vec<MdlFaceSet>,
    /// Material file paths, indexed by face-set material index
    pub materials: Vec<String>,
    /// Per-vertex bone influences. Empty for vertices no triangle
    /// references.
    pub influences: Vec<Vec<BoneInfluence>>,
}

/// A bone with its hierarchy position and resolved matrices
#[derive(Debug, Clone)]
pub struct SkeletonBone {
    pub name: String,
    pub parent: Option<usize>,
    /// Local transform relative to the parent
    pub local: Mat4,
    /// Transform relative to the model root (`parent.world * local`)
    pub world: Mat4,
}

/// The bone hierarchy in declaration order, with a name lookup for
/// cross-file animation matching
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub bones: Vec<SkeletonBone>,
    by_name: HashMap<String, usize>,
}

impl Skeleton {
    /// Look up a bone index by name
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// A reconstructed animation: per-frame pose matrices for every keyed bone
#[derive(Debug, Clone, Default)]
pub struct AnimationClip {
    /// Name attached from a sequence whose graph node plays this
    /// animation directly; `None` for clips only reachable through
    /// blend or layer nodes
    pub name: Option<String>,
    pub flags: u32,
    pub duration: f32,
    pub frame_count: u32,
    /// Skeleton bone index to one pose matrix per frame. Bones absent
    /// here keep their rest pose for this clip.
    pub tracks: BTreeMap<usize, Vec<Mat4>>,
    pub frame_tags: BTreeMap<u32, String>,
}

/// All reconstructed animations plus the blend parameter names the
/// animation graph refers to
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    pub clips: Vec<AnimationClip>,
    pub blend_parameters: Vec<String>,
}

/// A camera placed relative to its owning bone
#[derive(Debug, Clone)]
pub struct ModelCamera {
    pub name: String,
    pub bone: u32,
    pub fov: f32,
    pub local: Mat4,
}

/// An attach point placed relative to its owning bone
#[derive(Debug, Clone)]
pub struct ModelAttachPoint {
    pub name: String,
    pub bone: u32,
    pub local: Mat4,
}

/// Recoverable conditions encountered while loading a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelDiagnostic {
    /// An unrecognized chunk was skipped using its declared size
    UnknownChunk { id: u32, size: u32 },
    /// The referenced external animation file was missing, unreadable or
    /// not a Spark model; embedded animations remain usable
    InvalidExternalAnimation { path: String },
}

/// A fully reconstructed model
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub geometry: Geometry,
    pub skeleton: Skeleton,
    pub animations: AnimationSet,
    pub cameras: Vec<ModelCamera>,
    pub attach_points: Vec<ModelAttachPoint>,
    pub diagnostics: Vec<ModelDiagnostic>,
}

impl Model {
    /// Assemble a model from decoded chunks. Pure; performs no I/O.
    ///
    /// When `external` is given, its animation chunks are reconstructed
    /// against the primary skeleton (bone matching by name) and the
    /// resulting clips appended after the embedded ones.
    pub fn from_chunks(chunks: &ChunkSet, external: Option<&ChunkSet>) -> Result<Self> {
        let skeleton = build_skeleton(chunks)?;
        let geometry = build_geometry(chunks)?;

        let mut clips = build_clips(chunks, &skeleton)?;
        if let Some(external) = external {
            clips.extend(build_clips(external, &skeleton)?);
        }

        let animations = AnimationSet {
            clips,
            blend_parameters: chunks
                .blend_parameters
                .as_ref()
                .map(|c| c.names.clone())
                .unwrap_or_default(),
        };

        let cameras = chunks
            .cameras
            .as_ref()
            .map(|c| {
                c.cameras
                    .iter()
                    .map(|camera| ModelCamera {
                        name: camera.name.clone(),
                        bone: camera.bone,
                        fov: camera.fov,
                        local: camera.frame.to_mat4(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let attach_points = chunks
            .attach_points
            .as_ref()
            .map(|c| {
                c.attach_points
                    .iter()
                    .map(|point| ModelAttachPoint {
                        name: point.name.clone(),
                        bone: point.bone,
                        local: point.frame.to_mat4(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut diagnostics: Vec<ModelDiagnostic> = chunks
            .skipped
            .iter()
            .map(|s| ModelDiagnostic::UnknownChunk {
                id: s.id,
                size: s.size,
            })
            .collect();
        if let Some(external) = external {
            diagnostics.extend(external.skipped.iter().map(|s| {
                ModelDiagnostic::UnknownChunk {
                    id: s.id,
                    size: s.size,
                }
            }));
        }

        Ok(Self {
            geometry,
            skeleton,
            animations,
            cameras,
            attach_points,
            diagnostics,
        })
    }

    /// Open `path`, parse it and assemble the model.
    ///
    /// An external animation reference is resolved against `game_dir`
    /// when given, otherwise against the model's own directory. A
    /// missing or malformed external file degrades to the embedded
    /// animations and records an
    /// [`ModelDiagnostic::InvalidExternalAnimation`].
    pub fn load<P: AsRef<Path>>(path: P, game_dir: Option<&Path>) -> Result<Self> {
        let path = path.as_ref();
        let chunks = {
            let mut reader = BufReader::new(File::open(path)?);
            parser::parse(&mut reader)?
        };

        let mut external = None;
        let mut external_failure = None;
        if let Some(reference) = &chunks.external_animation {
            let base: PathBuf = game_dir
                .map(Path::to_path_buf)
                .or_else(|| path.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            let external_path = base.join(&reference.path);

            match parse_file(&external_path) {
                Ok(set) => external = Some(set),
                Err(err) => {
                    warn!(
                        "invalid external animation model {}: {err}",
                        external_path.display()
                    );
                    external_failure = Some(reference.path.clone());
                }
            }
        }

        let mut model = Self::from_chunks(&chunks, external.as_ref())?;
        if let Some(path) = external_failure {
            model
                .diagnostics
                .push(ModelDiagnostic::InvalidExternalAnimation { path });
        }
        Ok(model)
    }
}

fn parse_file(path: &Path) -> Result<ChunkSet> {
    let mut reader = BufReader::new(File::open(path)?);
    parser::parse(&mut reader)
}

/// Resolve world matrices in a single declaration-order pass.
///
/// A parent must be declared before its children; a forward or
/// self-referencing parent index is rejected rather than resolved in a
/// second pass.
fn build_skeleton(chunks: &ChunkSet) -> Result<Skeleton> {
    let Some(chunk) = &chunks.bones else {
        return Ok(Skeleton::default());
    };

    let mut bones: Vec<SkeletonBone> = Vec::with_capacity(chunk.bones.len());
    let mut by_name = HashMap::with_capacity(chunk.bones.len());

    for (index, bone) in chunk.bones.iter().enumerate() {
        let parent = if bone.parent < 0 {
            None
        } else {
            let parent = bone.parent as usize;
            if parent >= index {
                return Err(MdlError::ParseError(format!(
                    "bone {index} ({:?}) references parent {parent} which is not declared earlier",
                    bone.name
                )));
            }
            Some(parent)
        };

        let local = bone.transform.to_mat4();
        let world = match parent {
            Some(parent) => bones[parent].world * local,
            None => local,
        };

        by_name.insert(bone.name.clone(), index);
        bones.push(SkeletonBone {
            name: bone.name.clone(),
            parent,
            local,
            world,
        });
    }

    Ok(Skeleton { bones, by_name })
}

fn build_geometry(chunks: &ChunkSet) -> Result<Geometry> {
    let vertices = chunks
        .vertices
        .as_ref()
        .map(|c| c.vertices.clone())
        .unwrap_or_default();
    let triangles = chunks
        .indices
        .as_ref()
        .map(|c| c.triangles.clone())
        .unwrap_or_default();
    let face_sets = chunks
        .face_sets
        .as_ref()
        .map(|c| c.face_sets.clone())
        .unwrap_or_default();
    let materials = chunks
        .materials
        .as_ref()
        .map(|c| c.names.clone())
        .unwrap_or_default();

    let influences = resolve_influences(&vertices, &triangles, &face_sets)?;

    Ok(Geometry {
        vertices,
        triangles,
        face_sets,
        materials,
        influences,
    })
}

/// Map each vertex's weight slots to global bone indices.
///
/// Face sets are scanned in order and every triangle in a set's range
/// marks the set as owner of its three vertices, so a vertex shared
/// across sets is owned by the set processed last. That tie-break is
/// part of the format's observed behavior and is preserved as is.
fn resolve_influences(
    vertices: &[MdlVertex],
    triangles: &[[u32; 3]],
    face_sets: &[MdlFaceSet],
) -> Result<Vec<Vec<BoneInfluence>>> {
    let mut owner: Vec<Option<usize>> = vec![None; vertices.len()];

    for (set_index, set) in face_sets.iter().enumerate() {
        let first = set.first_face as usize;
        let end = first
            .checked_add(set.face_count as usize)
            .filter(|&end| end <= triangles.len())
            .ok_or_else(|| {
                MdlError::ParseError(format!(
                    "face set {set_index} covers triangles {first}..{} but only {} exist",
                    first + set.face_count as usize,
                    triangles.len()
                ))
            })?;

        for triangle in &triangles[first..end] {
            for &vertex in triangle {
                let slot = owner.get_mut(vertex as usize).ok_or_else(|| {
                    MdlError::ParseError(format!(
                        "face set {set_index} references vertex {vertex} out of range"
                    ))
                })?;
                *slot = Some(set_index);
            }
        }
    }

    let mut influences = vec![Vec::new(); vertices.len()];
    for (index, vertex) in vertices.iter().enumerate() {
        let Some(set_index) = owner[index] else {
            continue;
        };
        let set = &face_sets[set_index];

        for weight in vertex.active_weights() {
            let bone = set.bones.get(weight.bone as usize).copied().ok_or_else(|| {
                MdlError::ParseError(format!(
                    "vertex {index} weight slot {} exceeds face set {set_index} bone list of {}",
                    weight.bone,
                    set.bones.len()
                ))
            })?;
            influences[index].push(BoneInfluence {
                bone,
                weight: weight.weight,
            });
        }
    }

    Ok(influences)
}

/// Reconstruct pose matrices for every animation in `chunks`.
///
/// Key bone indices refer to `chunks`' own bone table; they are matched
/// to the target skeleton by name, which is what makes external
/// animation files work against the primary skeleton. Names the skeleton
/// does not have are skipped without error.
fn build_clips(chunks: &ChunkSet, skeleton: &Skeleton) -> Result<Vec<AnimationClip>> {
    let Some(animations) = &chunks.animations else {
        return Ok(Vec::new());
    };

    let source_names: Vec<&str> = chunks
        .bones
        .as_ref()
        .map(|c| c.bones.iter().map(|b| b.name.as_str()).collect())
        .unwrap_or_default();

    let mut clips = Vec::with_capacity(animations.animations.len());
    for animation in &animations.animations {
        let frame_count = animation.key_count as usize;

        // Source bone index -> skeleton bone index, keyed by the latter so
        // iteration is parent-before-child.
        let mut keyed: BTreeMap<usize, &Vec<AffineParts>> = BTreeMap::new();
        for (&source_bone, keys) in &animation.keys {
            if keys.len() != frame_count {
                return Err(MdlError::ParseError(format!(
                    "bone {source_bone} has {} keys, animation declares {frame_count}",
                    keys.len()
                )));
            }
            let Some(&name) = source_names.get(source_bone as usize) else {
                warn!("animation keys bone {source_bone} beyond the bone table; skipping");
                continue;
            };
            let Some(target) = skeleton.bone_index(name) else {
                continue;
            };
            keyed.insert(target, keys);
        }

        let mut tracks: BTreeMap<usize, Vec<Mat4>> = keyed
            .keys()
            .map(|&bone| (bone, Vec::with_capacity(frame_count)))
            .collect();

        // Poses accumulate down the hierarchy per frame: a keyed bone
        // composes with its parent's pose for the same frame, and an
        // unkeyed parent contributes its rest world matrix.
        let mut pose: Vec<Mat4> = Vec::with_capacity(skeleton.len());
        for frame in 0..frame_count {
            pose.clear();
            pose.extend(skeleton.bones.iter().map(|b| b.world));

            for (&bone, keys) in &keyed {
                let local = keys[frame].to_mat4();
                let matrix = match skeleton.bones[bone].parent {
                    Some(parent) => pose[parent] * local,
                    None => local,
                };
                pose[bone] = matrix;
                if let Some(track) = tracks.get_mut(&bone) {
                    track.push(matrix);
                }
            }
        }

        clips.push(AnimationClip {
            name: None,
            flags: animation.flags,
            duration: animation.duration,
            frame_count: animation.key_count,
            tracks,
            frame_tags: animation.frame_tags.clone(),
        });
    }

    apply_sequence_names(chunks, &mut clips);
    Ok(clips)
}

/// Attach sequence names to the clips their graph nodes play directly.
///
/// Blend and layer nodes reference several animations at once and are
/// deliberately not propagated; those clips keep `name: None`.
fn apply_sequence_names(chunks: &ChunkSet, clips: &mut [AnimationClip]) {
    let (Some(sequences), Some(nodes)) = (&chunks.sequences, &chunks.animation_nodes) else {
        return;
    };

    for sequence in &sequences.sequences {
        let Some(node) = nodes.nodes.get(sequence.node as usize) else {
            warn!(
                "sequence {:?} references animation node {} out of range",
                sequence.name, sequence.node
            );
            continue;
        };
        if let MdlAnimationNodeKind::Animation { animation } = &node.kind {
            if let Some(clip) = clips.get_mut(*animation as usize) {
                clip.name = Some(sequence.name.clone());
            }
        }
    }
}
