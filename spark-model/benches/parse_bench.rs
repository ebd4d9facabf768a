use criterion::{Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::io::Cursor;

use spark_model::chunks::{
    BonesChunk, Chunk, FaceSetsChunk, IndicesChunk, MdlAnimation, MdlBone, MdlFaceSet, MdlVertex,
    VerticesChunk,
};
use spark_model::{AffineParts, Model, parser};

fn create_test_stream() -> Vec<u8> {
    let vertices = (0..2_000).map(|_| MdlVertex::default()).collect();

    let triangles: Vec<[u32; 3]> = (0..600)
        .map(|i| {
            let base = (i % 1_900) as u32;
            [base, base + 1, base + 2]
        })
        .collect();

    let bones: Vec<MdlBone> = (0..40)
        .map(|i| MdlBone {
            name: format!("bone_{i}"),
            parent: i as i32 - 1,
            transform: AffineParts {
                translation: [0.1, 0.0, 0.0],
                ..AffineParts::IDENTITY
            },
        })
        .collect();

    let mut keys = BTreeMap::new();
    for bone in 0..40u32 {
        keys.insert(bone, vec![AffineParts::IDENTITY; 60]);
    }
    let animations = vec![MdlAnimation {
        key_count: 60,
        duration: 2.0,
        keys,
        ..MdlAnimation::default()
    }];

    let chunks = [
        Chunk::Vertices(VerticesChunk { vertices }),
        Chunk::Indices(IndicesChunk { triangles }),
        Chunk::FaceSets(FaceSetsChunk {
            face_sets: vec![MdlFaceSet {
                material: 0,
                first_face: 0,
                face_count: 600,
                bones: (0..40).collect(),
            }],
        }),
        Chunk::Bones(BonesChunk { bones }),
        Chunk::Animations(spark_model::chunks::AnimationsChunk { animations }),
    ];

    let mut data = Vec::new();
    parser::write_model(&mut data, &chunks).unwrap();
    data
}

fn bench_parse(c: &mut Criterion) {
    let data = create_test_stream();

    c.bench_function("parse_chunks", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(&data);
            parser::parse(&mut cursor).unwrap()
        })
    });
}

fn bench_assemble(c: &mut Criterion) {
    let data = create_test_stream();
    let set = parser::parse(&mut Cursor::new(&data)).unwrap();

    c.bench_function("assemble_model", |b| {
        b.iter(|| Model::from_chunks(&set, None).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_assemble);
criterion_main!(benches);
