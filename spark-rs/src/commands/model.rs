//! Model file command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use spark_model::{Model, ModelDiagnostic};

#[derive(Subcommand)]
pub enum ModelCommands {
    /// Display information about a model file
    Info {
        /// Path to the model file
        file: PathBuf,

        /// Game data directory used to resolve external animation files
        #[arg(short, long)]
        game_dir: Option<PathBuf>,

        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Display the bone hierarchy as a tree
    Tree {
        /// Path to the model file
        file: PathBuf,

        /// Game data directory used to resolve external animation files
        #[arg(short, long)]
        game_dir: Option<PathBuf>,
    },

    /// Validate a model file and report diagnostics
    Validate {
        /// Path to the model file
        file: PathBuf,

        /// Game data directory used to resolve external animation files
        #[arg(short, long)]
        game_dir: Option<PathBuf>,
    },
}

pub fn execute(cmd: ModelCommands) -> Result<()> {
    match cmd {
        ModelCommands::Info {
            file,
            game_dir,
            detailed,
        } => handle_info(file, game_dir, detailed),
        ModelCommands::Tree { file, game_dir } => handle_tree(file, game_dir),
        ModelCommands::Validate { file, game_dir } => handle_validate(file, game_dir),
    }
}

fn load(path: &Path, game_dir: Option<PathBuf>) -> Result<Model> {
    Model::load(path, game_dir.as_deref())
        .with_context(|| format!("Failed to load model from {}", path.display()))
}

fn handle_info(path: PathBuf, game_dir: Option<PathBuf>, detailed: bool) -> Result<()> {
    println!("Loading model: {}", path.display());

    let model = load(&path, game_dir)?;

    println!("\n=== Model Information ===");
    println!("Vertices:      {}", model.geometry.vertices.len());
    println!("Triangles:     {}", model.geometry.triangles.len());
    println!("Face sets:     {}", model.geometry.face_sets.len());
    println!("Materials:     {}", model.geometry.materials.len());
    println!("Bones:         {}", model.skeleton.len());
    println!("Animations:    {}", model.animations.clips.len());
    println!("Cameras:       {}", model.cameras.len());
    println!("Attach points: {}", model.attach_points.len());

    if detailed {
        if !model.geometry.materials.is_empty() {
            println!("\n=== Materials ===");
            for (index, material) in model.geometry.materials.iter().enumerate() {
                println!("  [{index}] {material}");
            }
        }

        if !model.animations.clips.is_empty() {
            println!("\n=== Animations ===");
            for (index, clip) in model.animations.clips.iter().enumerate() {
                let name = clip.name.as_deref().unwrap_or("<unnamed>");
                println!(
                    "  [{index}] {name}: {} frames over {:.3}s, {} keyed bones",
                    clip.frame_count,
                    clip.duration,
                    clip.tracks.len()
                );
            }
        }

        if !model.animations.blend_parameters.is_empty() {
            println!("\n=== Blend Parameters ===");
            for (index, parameter) in model.animations.blend_parameters.iter().enumerate() {
                println!("  [{index}] {parameter}");
            }
        }

        for point in &model.attach_points {
            println!("Attach point {:?} on bone {}", point.name, point.bone);
        }
    }

    print_diagnostics(&model);
    Ok(())
}

fn handle_tree(path: PathBuf, game_dir: Option<PathBuf>) -> Result<()> {
    let model = load(&path, game_dir)?;

    println!("{}", path.display());
    if model.skeleton.is_empty() {
        println!("(no bones)");
        return Ok(());
    }

    // Children grouped per bone; indices stay in declaration order
    let mut children = vec![Vec::new(); model.skeleton.len()];
    let mut roots = Vec::new();
    for (index, bone) in model.skeleton.bones.iter().enumerate() {
        match bone.parent {
            Some(parent) => children[parent].push(index),
            None => roots.push(index),
        }
    }

    for (position, &root) in roots.iter().enumerate() {
        print_bone(&model, &children, root, "", position + 1 == roots.len());
    }

    print_diagnostics(&model);
    Ok(())
}

fn print_bone(model: &Model, children: &[Vec<usize>], index: usize, prefix: &str, last: bool) {
    let branch = if last { "└── " } else { "├── " };
    let bone = &model.skeleton.bones[index];
    let position = bone.world.w_axis;
    println!(
        "{prefix}{branch}{} [{index}] at ({:.2}, {:.2}, {:.2})",
        bone.name, position.x, position.y, position.z
    );

    let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
    for (position, &child) in children[index].iter().enumerate() {
        print_bone(
            model,
            children,
            child,
            &child_prefix,
            position + 1 == children[index].len(),
        );
    }
}

fn handle_validate(path: PathBuf, game_dir: Option<PathBuf>) -> Result<()> {
    println!("Validating model: {}", path.display());

    let model = load(&path, game_dir)?;

    if model.diagnostics.is_empty() {
        println!("✓ Model validation passed!");
    } else {
        println!(
            "✓ Model loaded with {} diagnostic(s):",
            model.diagnostics.len()
        );
        print_diagnostics(&model);
    }

    Ok(())
}

fn print_diagnostics(model: &Model) {
    for diagnostic in &model.diagnostics {
        match diagnostic {
            ModelDiagnostic::UnknownChunk { id, size } => {
                println!("  warning: skipped unknown chunk id {id} ({size} bytes)");
            }
            ModelDiagnostic::InvalidExternalAnimation { path } => {
                println!("  warning: external animation file {path:?} could not be loaded");
            }
        }
    }
}
