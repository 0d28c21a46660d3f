use std::path::Path;

use taman::{SceneRenderer, Surface};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let t: f64 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(10.0);

    let mut surface = Surface::for_container(1280)?;
    let mut renderer = SceneRenderer::new();
    if !renderer.has_caption_text() {
        eprintln!("no system font found; caption text is omitted");
    }
    renderer.render(&mut surface, t)?;

    let out_path = Path::new("target/taman_demos").join(format!("park_{t:.2}s.png"));
    surface.snapshot().write_png(&out_path)?;
    eprintln!("wrote {}", out_path.display());
    Ok(())
}
