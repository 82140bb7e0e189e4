use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use vecrender::logging::{init_logging, LoggingConfig};
use vecrender::prelude::*;
use vecrender::scene::obj::load_obj;
use vecrender::scene::primitives;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shading {
    Basic,
    Lambert,
    Phong,
    Normal,
}

/// Render a mesh to an SVG file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// OBJ file to render; the built-in cube when omitted.
    model: Option<PathBuf>,

    #[arg(short, long, default_value = "scene.svg")]
    output: PathBuf,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    /// Camera distance from the origin along +Z.
    #[arg(long, default_value_t = 5.0)]
    distance: f32,

    /// Rotation applied to the model, in degrees around X then Y.
    #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values_t = [25.0, 35.0])]
    rotate: Vec<f32>,

    #[arg(long, value_enum, default_value_t = Shading::Lambert)]
    shading: Shading,

    /// Stroke triangle outlines instead of filling them.
    #[arg(long)]
    wireframe: bool,

    /// Decimals kept in path coordinates.
    #[arg(long)]
    precision: Option<usize>,

    /// Ask viewers to skip anti-aliasing.
    #[arg(long)]
    low_quality: bool,

    /// Background color as hex, e.g. 202020.
    #[arg(long, value_parser = parse_hex)]
    background: Option<u32>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_hex(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches('#'), 16).map_err(|e| e.to_string())
}

fn material(args: &Args) -> Material {
    let color = Color::from_hex(0xd0d0d0);
    let material = match args.shading {
        Shading::Basic => Material::basic(color),
        Shading::Lambert => Material::lambert(color),
        Shading::Phong => Material::phong(color),
        Shading::Normal => Material::normal(),
    };
    if args.wireframe {
        material.with_wireframe(1.0)
    } else {
        material
    }
}

fn load_geometry(args: &Args) -> Result<Vec<Geometry>> {
    match &args.model {
        Some(path) => {
            let models =
                load_obj(path).with_context(|| format!("loading {}", path.display()))?;
            log::info!("loaded {} object(s) from {}", models.len(), path.display());
            Ok(models.into_iter().map(|m| m.geometry.into()).collect())
        }
        None => Ok(vec![primitives::cube().into()]),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig::from_verbosity(args.verbose));

    let material = material(&args).shared();
    let mut model = Node::group().with_name("model");
    model
        .transform
        .set_rotation_xyz(args.rotate[0].to_radians(), args.rotate[1].to_radians(), 0.0);
    for geometry in load_geometry(&args)? {
        model.add(Node::mesh(Rc::new(geometry), Rc::clone(&material)));
    }

    let mut scene = Scene::new();
    scene.background = args.background.map(Color::from_hex);
    scene
        .add(Node::light(Light::ambient(Color::new(0.2, 0.2, 0.2))))
        .add({
            let mut sun = Node::light(Light::directional(Color::WHITE, 0.8));
            sun.transform.set_position_xyz(1.0, 2.0, 3.0);
            sun
        })
        .add(model);

    let mut camera = Camera::perspective(args.fov, args.width / args.height, 0.1, 100.0);
    camera.transform.set_position_xyz(0.0, 0.0, args.distance);

    let mut renderer = VectorRenderer::new(args.width, args.height);
    renderer.set_precision(args.precision);
    if args.low_quality {
        renderer.set_quality(Quality::Low);
    }
    renderer.render(&scene, &camera);

    let info = renderer.info();
    fs::write(&args.output, renderer.to_svg())
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!(
        "wrote {} ({} faces, {} paths)",
        args.output.display(),
        info.faces,
        renderer.paths().len()
    );
    Ok(())
}
