//! Renders a scene twice, as filled triangles and as wireframe lines, and
//! writes both frames out as PNG files.

use scanline::{
    load_scene, load_scene_from_str, save_png, FragmentContext, FrameBuffer, Renderer, Shader,
    UVec2, Vertex,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEMO_SCENE: &str = include_str!("../../assets/scenes/demo.ron");

/// Rotates every vertex around the frame center before rasterization and
/// passes the interpolated color straight through. The rotated position is
/// clamped back into [0, 1] so wireframe draws cannot leave the frame.
struct SpinShader {
    angle: f32,
}

impl Shader for SpinShader {
    fn run_vertex(&mut self, vertex: &mut Vertex) {
        let (sin, cos) = self.angle.sin_cos();
        let x = vertex.position.x - 0.5;
        let y = vertex.position.y - 0.5;
        vertex.position.x = (x * cos - y * sin + 0.5).clamp(0.0, 1.0);
        vertex.position.y = (x * sin + y * cos + 0.5).clamp(0.0, 1.0);
    }

    fn run_fragment(&mut self, context: &mut FragmentContext) {
        context.output_color = context.varying_color;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = env_logger::Builder::new();
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();

    let args: Vec<String> = std::env::args().collect();
    let mut scene_path: Option<String> = None;
    let mut output = String::from("demo");
    let mut dimension: u32 = 256;
    let mut angle: f32 = 0.35;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scene" | "-s" => {
                i += 1;
                if i < args.len() {
                    scene_path = Some(args[i].clone());
                }
            }
            "--output" | "-o" => {
                i += 1;
                if i < args.len() {
                    output = args[i].clone();
                }
            }
            "--dimension" | "-d" => {
                i += 1;
                if i < args.len() {
                    dimension = args[i].parse().unwrap_or(dimension);
                }
            }
            "--angle" | "-a" => {
                i += 1;
                if i < args.len() {
                    angle = args[i].parse().unwrap_or(angle);
                }
            }
            "--help" | "-h" => {
                println!("scanline demo {}", VERSION);
                println!();
                println!("Renders a scene twice, once as filled triangles and once as");
                println!("wireframe lines, and writes both frames out as PNG files.");
                println!();
                println!("Options:");
                println!("  -s, --scene FILE     Scene file in RON format (default: embedded scene)");
                println!("  -o, --output PREFIX  Output file prefix (default: demo)");
                println!("  -d, --dimension N    Frame width and height in pixels (default: 256)");
                println!("  -a, --angle RADIANS  Rotation applied in the vertex stage (default: 0.35)");
                return Ok(());
            }
            other => {
                log::warn!("ignoring unknown argument {:?}", other);
            }
        }
        i += 1;
    }

    let scene = match &scene_path {
        Some(path) => load_scene(path)?,
        None => load_scene_from_str(DEMO_SCENE)?,
    };
    log::info!(
        "scene has {} vertices, {} line indices, {} triangle indices",
        scene.vertices.len(),
        scene.line_indices.len(),
        scene.triangle_indices.len()
    );

    let dimensions = UVec2::new(dimension, dimension);
    let mut triangle_frame = FrameBuffer::new(dimensions);
    let mut line_frame = FrameBuffer::new(dimensions);
    let mut shader = SpinShader { angle };

    let mut renderer = Renderer::new();
    renderer.bind_vertex_buffer(&scene.vertices);
    renderer.bind_shader(&mut shader);

    renderer.bind_frame_buffer(&mut triangle_frame);
    renderer.bind_index_buffer(&scene.triangle_indices);
    renderer.draw_triangles()?;

    renderer.bind_frame_buffer(&mut line_frame);
    renderer.bind_index_buffer(&scene.line_indices);
    renderer.draw_lines()?;

    let triangle_path = format!("{}_triangles.png", output);
    save_png(triangle_frame.color_buffer(), &triangle_path)?;
    log::info!("wrote {}", triangle_path);

    let line_path = format!("{}_lines.png", output);
    save_png(line_frame.color_buffer(), &line_path)?;
    log::info!("wrote {}", line_path);

    Ok(())
}
