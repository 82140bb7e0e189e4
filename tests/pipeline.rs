use approx::assert_relative_eq;
use vecrender::clipper::{clip_line, ClipPlane};
use vecrender::prelude::*;
use vecrender::render::Fill;

const SIZE: f32 = 100.0;

fn ortho_camera() -> Camera {
    let mut camera = Camera::orthographic(10.0, 10.0, 0.1, 100.0);
    camera.transform.set_position_xyz(0.0, 0.0, 10.0);
    camera
}

fn triangle() -> Rc<Geometry> {
    Rc::new(
        BufferGeometry::new()
            .with_positions(vec![
                -1.0, -1.0, 0.0, //
                1.0, -1.0, 0.0, //
                0.0, 1.0, 0.0,
            ])
            .with_normals(vec![
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0,
            ])
            .into(),
    )
}

fn triangle_at(x: f32, z: f32, material: impl Into<MaterialSlot>) -> Node {
    let mut node = Node::mesh(triangle(), material);
    node.transform.set_position_xyz(x, 0.0, z);
    node
}

fn fill_of(path: &vecrender::render::PathDescriptor) -> String {
    match &path.style.fill {
        Fill::Color(color) => color.clone(),
        Fill::None => String::from("none"),
    }
}

#[test]
fn red_triangle_renders_one_red_path() {
    let mut scene = Scene::new();
    scene.add(triangle_at(0.0, 0.0, Material::basic(Color::from_hex(0xff0000))));

    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let paths = renderer.render(&scene, &ortho_camera());
    assert_eq!(paths.len(), 1);
    assert_eq!(fill_of(&paths[0]), "rgb(255,0,0)");

    let svg = renderer.to_svg();
    assert!(svg.contains("fill=\"rgb(255,0,0)\""));
    assert!(svg.contains("viewBox=\"-50 -50 100 100\""));
}

#[test]
fn point_light_brightens_as_it_approaches() {
    let brightness = |light_z: f32| {
        let mut light = Node::light(Light::point(Color::WHITE, 1.0, 20.0));
        light.transform.set_position_xyz(0.0, 0.0, light_z);
        let mut scene = Scene::new();
        scene
            .add(light)
            .add(triangle_at(0.0, 0.0, Material::lambert(Color::WHITE)));

        let mut renderer = VectorRenderer::new(SIZE, SIZE);
        let reds = red_channels(renderer.render(&scene, &ortho_camera()));
        assert_eq!(reds.len(), 1);
        reds[0]
    };

    let near = brightness(2.0);
    let mid = brightness(8.0);
    let far = brightness(16.0);
    assert!(near > mid, "{near} <= {mid}");
    assert!(mid > far, "{mid} <= {far}");
}

fn quad() -> Rc<Geometry> {
    Rc::new(
        BufferGeometry::new()
            .with_positions(vec![
                -1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, //
                -1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0,
            ])
            .with_normals([0.0, 0.0, 1.0].repeat(6))
            .into(),
    )
}

fn red_channels(paths: &[vecrender::render::PathDescriptor]) -> Vec<u32> {
    paths
        .iter()
        .map(|path| {
            fill_of(path)
                .trim_start_matches("rgb(")
                .split(',')
                .next()
                .and_then(|r| r.parse::<u32>().ok())
                .unwrap_or(0)
        })
        .collect()
}

#[test]
fn point_light_intensity_is_monotonic() {
    let material = Material::lambert(Color::WHITE).shared();
    let mut previous = 0;
    let mut brightest = 0;
    for step in 0..=5 {
        let intensity = step as f32 * 0.25;
        let mut light = Node::light(Light::point(Color::WHITE, intensity, 0.0));
        light.transform.set_position_xyz(0.0, 0.0, 5.0);
        let mut scene = Scene::new();
        scene
            .add(light)
            .add(Node::mesh(quad(), Rc::clone(&material)));

        let mut renderer = VectorRenderer::new(SIZE, SIZE);
        let reds = red_channels(renderer.render(&scene, &ortho_camera()));
        assert_eq!(reds.len(), 2);
        if step == 0 {
            assert_eq!(reds, [0, 0]);
        }
        for red in reds {
            assert!(red >= previous, "intensity {intensity}: {red} < {previous}");
            brightest = brightest.max(red);
        }
        previous = brightest;
    }
    assert_eq!(brightest, 255);
}

#[test]
fn shared_style_batches_and_distinct_styles_do_not() {
    let shared = Material::basic(Color::WHITE).shared();
    let mut scene = Scene::new();
    scene
        .add(triangle_at(-3.0, 0.0, Rc::clone(&shared)))
        .add(triangle_at(3.0, 0.0, Rc::clone(&shared)));
    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let paths = renderer.render(&scene, &ortho_camera());
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].commands.matches('M').count(), 2);

    // Equal but separately built materials never merge.
    let mut scene = Scene::new();
    scene
        .add(triangle_at(-3.0, 0.0, Material::basic(Color::WHITE)))
        .add(triangle_at(3.0, 0.0, Material::basic(Color::WHITE)));
    assert_eq!(renderer.render(&scene, &ortho_camera()).len(), 2);
}

#[test]
fn rendering_twice_gives_identical_output() {
    let mut scene = Scene::new();
    scene
        .add(Node::light(Light::ambient(Color::new(0.3, 0.3, 0.3))))
        .add(triangle_at(-2.0, 0.0, Material::lambert(Color::WHITE)))
        .add(triangle_at(2.0, -1.0, Material::basic(Color::from_hex(0x00ff00))));

    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let first = renderer.render(&scene, &ortho_camera()).to_vec();
    let first_svg = renderer.to_svg();
    let second = renderer.render(&scene, &ortho_camera()).to_vec();
    assert_eq!(first, second);
    assert_eq!(first_svg, renderer.to_svg());
}

#[test]
fn double_sided_material_keeps_faces_seen_from_behind() {
    let mut camera = ortho_camera();
    camera.transform.set_position_xyz(0.0, 0.0, -10.0);
    camera.look_at(Vec3::ZERO);

    let mut scene = Scene::new();
    scene.add(triangle_at(0.0, 0.0, Material::basic(Color::WHITE)));
    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    assert!(renderer.render(&scene, &camera).is_empty());

    let mut scene = Scene::new();
    scene.add(triangle_at(
        0.0,
        0.0,
        Material::basic(Color::WHITE).with_side(Side::Double),
    ));
    assert_eq!(renderer.render(&scene, &camera).len(), 1);
}

#[test]
fn clipped_lines_end_inside_the_depth_range() {
    let cases = [
        (Vec4::new(0.0, 0.0, -3.0, 1.0), Vec4::new(0.0, 0.0, 3.0, 1.0)),
        (Vec4::new(0.5, 0.5, -0.5, 1.0), Vec4::new(-1.0, 2.0, 5.0, 1.0)),
        (Vec4::new(1.0, 0.0, -4.0, 2.0), Vec4::new(0.0, 1.0, 1.0, 2.0)),
    ];
    for (a, b) in cases {
        let (mut s1, mut s2) = (a, b);
        assert!(clip_line(&mut s1, &mut s2));
        for p in [s1, s2] {
            assert!(ClipPlane::Near.signed_distance(&p) >= -1e-5);
            assert!(ClipPlane::Far.signed_distance(&p) >= -1e-5);
        }
    }

    let mut behind_a = Vec4::new(0.0, 0.0, -5.0, 1.0);
    let mut behind_b = Vec4::new(1.0, 1.0, -2.0, 1.0);
    assert!(!clip_line(&mut behind_a, &mut behind_b));
}

#[test]
fn nearer_faces_are_drawn_last() {
    let mut scene = Scene::new();
    scene
        .add(triangle_at(0.0, 2.0, Material::basic(Color::from_hex(0x0000ff))))
        .add(triangle_at(0.0, -2.0, Material::basic(Color::from_hex(0xff0000))));

    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let paths = renderer.render(&scene, &ortho_camera());
    let fills: Vec<_> = paths.iter().map(fill_of).collect();
    assert_eq!(fills, ["rgb(255,0,0)", "rgb(0,0,255)"]);
}

#[test]
fn equal_depth_keeps_creation_order() {
    let first = triangle_at(-2.0, 0.0, Material::basic(Color::from_hex(0x010101)));
    let second = triangle_at(2.0, 0.0, Material::basic(Color::from_hex(0x020202)));
    let mut scene = Scene::new();
    scene.add(second).add(first);

    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let fills: Vec<_> = renderer
        .render(&scene, &ortho_camera())
        .iter()
        .map(fill_of)
        .collect();
    assert_eq!(fills, ["rgb(1,1,1)", "rgb(2,2,2)"]);
}

#[test]
fn render_order_overrides_depth() {
    let mut scene = Scene::new();
    scene
        .add(triangle_at(0.0, 2.0, Material::basic(Color::from_hex(0x0000ff))).with_render_order(1))
        .add(triangle_at(0.0, -2.0, Material::basic(Color::from_hex(0xff0000))));
    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let fills: Vec<_> = renderer
        .render(&scene, &ortho_camera())
        .iter()
        .map(fill_of)
        .collect();
    assert_eq!(fills, ["rgb(255,0,0)", "rgb(0,0,255)"]);
}

#[test]
fn vector_nodes_are_placed_at_their_projected_origin() {
    let style = PathStyle::filled(Color::WHITE, 1.0).shared();
    let mut label = Node::vector("M0,0h4v4h-4z", style);
    label.transform.set_position_xyz(1.0, 1.0, 0.0);
    let mut behind = Node::vector("M0,0h1", PathStyle::default().shared());
    behind.transform.set_position_xyz(0.0, 0.0, 20.0);

    let mut scene = Scene::new();
    scene.add(label).add(behind);
    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let paths = renderer.render(&scene, &ortho_camera());
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].transform.as_deref(), Some("translate(10,-10)"));
    assert!(renderer.to_svg().contains("transform=\"translate(10,-10)\""));
}

#[test]
fn unusable_camera_draws_nothing() {
    let mut scene = Scene::new();
    scene.add(triangle_at(0.0, 0.0, Material::basic(Color::WHITE)));
    let mut renderer = VectorRenderer::new(SIZE, SIZE);

    let mut flat = ortho_camera();
    flat.transform.set_scale(Vec3::new(1.0, 0.0, 1.0));
    assert!(renderer.render(&scene, &flat).is_empty());

    let degenerate = Camera::perspective(60.0, 1.0, 5.0, 1.0);
    assert!(renderer.render(&scene, &degenerate).is_empty());
}

#[test]
fn clear_color_and_auto_clear() {
    let mut scene = Scene::new();
    scene.add(triangle_at(0.0, 0.0, Material::basic(Color::WHITE)));

    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    renderer.set_clear_color(Color::from_hex(0x336699), None);
    renderer.render(&scene, &ortho_camera());
    assert!(renderer.to_svg().contains("<rect"));
    assert!(renderer.to_svg().contains("fill=\"rgb(51,102,153)\""));

    // Without auto clear the previous frame's paths stay.
    renderer.config_mut().auto_clear = false;
    renderer.render(&scene, &ortho_camera());
    assert_eq!(renderer.paths().len(), 2);

    scene.background = Some(Color::BLACK);
    renderer.render(&scene, &ortho_camera());
    assert_eq!(renderer.paths().len(), 1);
    assert!(renderer.to_svg().contains("fill=\"rgb(0,0,0)\""));
}

#[test]
fn lit_colors_stay_within_channel_range() {
    let mut sun = Node::light(Light::directional(Color::WHITE, 3.0));
    sun.transform.set_position_xyz(0.0, 0.0, 1.0);
    let mut scene = Scene::new();
    scene
        .add(sun)
        .add(Node::light(Light::ambient(Color::WHITE)))
        .add(triangle_at(0.0, 0.0, Material::phong(Color::WHITE)));

    let mut renderer = VectorRenderer::new(SIZE, SIZE);
    let paths = renderer.render(&scene, &ortho_camera());
    assert_eq!(fill_of(&paths[0]), "rgb(255,255,255)");
    assert_relative_eq!(renderer.lighting().ambient().r, 1.0);
}
