use std::path::Path;

use taman::{
    CaptureBackend as _, FfmpegBackend, FfmpegBackendOpts, FrameLoopOpts, SceneRenderer,
    record_clip,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let backend = FfmpegBackend::new(FfmpegBackendOpts::default());
    if !backend.is_available() {
        anyhow::bail!(
            "'{}' with libvpx is required (set TAMAN_FFMPEG to override)",
            backend.opts().ffmpeg_bin.display()
        );
    }

    let blob = record_clip(
        960,
        SceneRenderer::new(),
        Box::new(backend),
        FrameLoopOpts::default(),
    )?;
    let path = blob.save_to_dir(Path::new("target/taman_demos"))?;
    eprintln!("wrote {} ({}, {} bytes)", path.display(), blob.mime_type(), blob.len());
    Ok(())
}
