//! Filesystem loading tests, including the external animation flow.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glam::Vec3;
use spark_model::chunks::{
    AnimationsChunk, BonesChunk, Chunk, ExternalAnimationChunk, MdlAnimation, MdlBone,
};
use spark_model::{AffineParts, Model, ModelDiagnostic, parser};

fn bone(name: &str, parent: i32, translation: [f32; 3]) -> MdlBone {
    MdlBone {
        name: name.to_string(),
        parent,
        transform: AffineParts {
            translation,
            ..AffineParts::IDENTITY
        },
    }
}

fn write_file(path: &Path, chunks: &[Chunk]) {
    let mut data = Vec::new();
    parser::write_model(&mut data, chunks).unwrap();
    fs::write(path, data).unwrap();
}

fn primary_chunks(external: Option<&str>) -> Vec<Chunk> {
    let mut chunks = vec![Chunk::Bones(BonesChunk {
        bones: vec![bone("root", -1, [0.0; 3]), bone("arm", 0, [1.0, 0.0, 0.0])],
    })];
    if let Some(path) = external {
        chunks.push(Chunk::ExternalAnimation(ExternalAnimationChunk {
            path: path.to_string(),
        }));
    }
    chunks
}

fn animation_chunks() -> Vec<Chunk> {
    let mut keys = BTreeMap::new();
    keys.insert(
        1,
        vec![AffineParts {
            translation: [0.0, 2.0, 0.0],
            ..AffineParts::IDENTITY
        }],
    );

    vec![
        Chunk::Bones(BonesChunk {
            bones: vec![bone("root", -1, [0.0; 3]), bone("arm", 0, [0.0; 3])],
        }),
        Chunk::Animations(AnimationsChunk {
            animations: vec![MdlAnimation {
                key_count: 1,
                duration: 0.25,
                keys,
                ..MdlAnimation::default()
            }],
        }),
    ]
}

#[test]
fn test_load_without_external_reference() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unit.mdl");
    write_file(&path, &primary_chunks(None));

    let model = Model::load(&path, None).unwrap();
    assert_eq!(model.skeleton.len(), 2);
    assert!(model.animations.clips.is_empty());
    assert!(model.diagnostics.is_empty());
}

#[test]
fn test_external_animations_resolved_next_to_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unit.mdl");
    write_file(&path, &primary_chunks(Some("unit_anim.mdl")));
    write_file(&dir.path().join("unit_anim.mdl"), &animation_chunks());

    let model = Model::load(&path, None).unwrap();
    assert!(model.diagnostics.is_empty());
    assert_eq!(model.animations.clips.len(), 1);

    // The external clip drives the primary skeleton's "arm" bone
    let pose = model.animations.clips[0].tracks[&1][0].w_axis.truncate();
    assert_eq!(pose, Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn test_external_path_resolved_against_game_dir() {
    let model_dir = tempfile::tempdir().unwrap();
    let game_dir = tempfile::tempdir().unwrap();

    let path = model_dir.path().join("unit.mdl");
    write_file(&path, &primary_chunks(Some("anims/unit_anim.mdl")));

    fs::create_dir(game_dir.path().join("anims")).unwrap();
    write_file(
        &game_dir.path().join("anims/unit_anim.mdl"),
        &animation_chunks(),
    );

    let model = Model::load(&path, Some(game_dir.path())).unwrap();
    assert!(model.diagnostics.is_empty());
    assert_eq!(model.animations.clips.len(), 1);
}

#[test]
fn test_missing_external_file_degrades_to_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unit.mdl");
    write_file(&path, &primary_chunks(Some("gone.mdl")));

    let model = Model::load(&path, None).unwrap();
    assert_eq!(model.skeleton.len(), 2);
    assert_eq!(
        model.diagnostics,
        vec![ModelDiagnostic::InvalidExternalAnimation {
            path: "gone.mdl".to_string()
        }]
    );
}

#[test]
fn test_external_file_with_bad_magic_degrades_to_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unit.mdl");
    write_file(&path, &primary_chunks(Some("broken.mdl")));
    fs::write(dir.path().join("broken.mdl"), b"not a model").unwrap();

    let model = Model::load(&path, None).unwrap();
    assert_eq!(
        model.diagnostics,
        vec![ModelDiagnostic::InvalidExternalAnimation {
            path: "broken.mdl".to_string()
        }]
    );
}
