use crate::capture::error::{CaptureError, CaptureResult};
use crate::capture::recorder::{
    CaptureBackend, DEFAULT_MIME_TYPE, Recorder, RecorderEvent, RecorderRequest,
};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TamanError, TamanResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGBA;
use std::collections::BTreeSet;
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

/// Environment variable overriding the `ffmpeg` binary.
pub const FFMPEG_ENV: &str = "TAMAN_FFMPEG";

const VP9_MIME: &str = "video/webm;codecs=vp9";
const VP8_MIME: &str = "video/webm;codecs=vp8";
const VP9_ENCODER: &str = "libvpx-vp9";
const VP8_ENCODER: &str = "libvpx";

/// Options for [`FfmpegBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegBackendOpts {
    /// `ffmpeg` executable; defaults to `$TAMAN_FFMPEG`, else `ffmpeg` from `PATH`.
    pub ffmpeg_bin: PathBuf,
    /// Constant rate factor for libvpx (0..=63, lower is better).
    pub crf: u8,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl Default for FfmpegBackendOpts {
    fn default() -> Self {
        Self {
            ffmpeg_bin: std::env::var_os(FFMPEG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ffmpeg")),
            crf: 32,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

impl FfmpegBackendOpts {
    /// Use `bin` as the `ffmpeg` executable.
    pub fn with_ffmpeg_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.ffmpeg_bin = bin.into();
        self
    }

    /// Set the constant rate factor, clamped to libvpx's range.
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf.min(63);
        self
    }

    /// Set the flatten background.
    pub fn with_bg_rgba(mut self, bg_rgba: [u8; 4]) -> Self {
        self.bg_rgba = bg_rgba;
        self
    }
}

/// Recording capability backed by the system `ffmpeg`.
///
/// Raw frames go to `ffmpeg` on stdin; WebM comes back on stdout and is delivered as data events
/// once per timeslice. The encoder list is probed once and cached.
#[derive(Debug, Default)]
pub struct FfmpegBackend {
    opts: FfmpegBackendOpts,
    encoders: OnceLock<Option<BTreeSet<String>>>,
}

impl FfmpegBackend {
    /// Create a backend with `opts`.
    pub fn new(opts: FfmpegBackendOpts) -> Self {
        Self {
            opts,
            encoders: OnceLock::new(),
        }
    }

    /// Options in effect.
    pub fn opts(&self) -> &FfmpegBackendOpts {
        &self.opts
    }

    fn encoders(&self) -> Option<&BTreeSet<String>> {
        self.encoders
            .get_or_init(|| probe_encoders(&self.opts.ffmpeg_bin))
            .as_ref()
    }

    fn has_encoder(&self, name: &str) -> bool {
        self.encoders().is_some_and(|e| e.contains(name))
    }
}

impl CaptureBackend for FfmpegBackend {
    fn is_available(&self) -> bool {
        self.has_encoder(VP9_ENCODER) || self.has_encoder(VP8_ENCODER)
    }

    fn is_type_supported(&self, mime_type: &str) -> bool {
        match mime_type {
            VP9_MIME => self.has_encoder(VP9_ENCODER),
            VP8_MIME => self.has_encoder(VP8_ENCODER),
            DEFAULT_MIME_TYPE => self.is_available(),
            _ => false,
        }
    }

    fn open(
        &mut self,
        req: RecorderRequest,
        events: Sender<RecorderEvent>,
    ) -> CaptureResult<Box<dyn Recorder>> {
        let (mime_type, encoder) = match req.mime_type.as_deref() {
            Some(VP9_MIME) => (VP9_MIME, VP9_ENCODER),
            Some(VP8_MIME) => (VP8_MIME, VP8_ENCODER),
            Some(other) => {
                return Err(CaptureError::StartFailure(format!(
                    "unsupported media type '{other}'"
                )));
            }
            None if self.has_encoder(VP9_ENCODER) => (DEFAULT_MIME_TYPE, VP9_ENCODER),
            None if self.has_encoder(VP8_ENCODER) => (DEFAULT_MIME_TYPE, VP8_ENCODER),
            None => return Err(CaptureError::CapabilityUnsupported),
        };
        let recorder = FfmpegRecorder::spawn(&self.opts, req, encoder, mime_type, events)
            .map_err(|e| CaptureError::StartFailure(e.to_string()))?;
        Ok(Box::new(recorder))
    }
}

struct FfmpegRecorder {
    mime_type: String,
    canvas: Canvas,
    bg_rgba: [u8; 4],
    child: Arc<Mutex<Child>>,
    stdin: Option<ChildStdin>,
    cancelled: Arc<AtomicBool>,
    reader: Option<std::thread::JoinHandle<()>>,
    scratch: Vec<u8>,
}

impl FfmpegRecorder {
    fn spawn(
        opts: &FfmpegBackendOpts,
        req: RecorderRequest,
        encoder: &str,
        mime_type: &str,
        events: Sender<RecorderEvent>,
    ) -> TamanResult<Self> {
        let canvas = req.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(TamanError::validation(
                "ffmpeg recorder width/height must be non-zero",
            ));
        }

        let mut cmd = Command::new(&opts.ffmpeg_bin);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        push_args(&mut cmd, canvas, req.fps, encoder, opts.crf, req.timeslice);
        tracing::debug!(?cmd, "spawning ffmpeg");

        let mut child = cmd.spawn().map_err(|e| {
            TamanError::encode(format!(
                "failed to spawn '{}': {e}",
                opts.ffmpeg_bin.display()
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TamanError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TamanError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TamanError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        let child = Arc::new(Mutex::new(child));
        let cancelled = Arc::new(AtomicBool::new(false));
        let reader = {
            let pump = OutputPump {
                session: req.session,
                timeslice: req.timeslice,
                events,
                cancelled: Arc::clone(&cancelled),
                child: Arc::clone(&child),
            };
            std::thread::spawn(move || pump.run(stdout, stderr_drain))
        };

        Ok(Self {
            mime_type: mime_type.to_string(),
            canvas,
            bg_rgba: opts.bg_rgba,
            child,
            stdin: Some(stdin),
            cancelled,
            reader: Some(reader),
            scratch: vec![0u8; canvas.rgba_len()],
        })
    }
}

impl Recorder for FfmpegRecorder {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn push_frame(&mut self, frame: &FrameRGBA) -> CaptureResult<()> {
        if frame.canvas() != self.canvas {
            return Err(CaptureError::RuntimeFault(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CaptureError::RuntimeFault(
                "ffmpeg recorder is already finalized".to_string(),
            ));
        };
        let fault = |e: TamanError| CaptureError::RuntimeFault(e.to_string());
        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.bg_rgba)
                .map_err(fault)?;
        } else {
            flatten_straight_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.bg_rgba)
                .map_err(fault)?;
        }
        stdin.write_all(&self.scratch).map_err(|e| {
            CaptureError::RuntimeFault(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn stop(&mut self) {
        // Closing stdin lets ffmpeg flush and exit; the reader thread reports the outcome.
        drop(self.stdin.take());
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        drop(self.stdin.take());
        // The reader holds the lock only while waiting on an exiting process.
        if let Ok(mut child) = self.child.try_lock() {
            let _ = child.kill();
        }
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            self.cancel();
        }
        // The reader finishes on its own once ffmpeg exits; don't block the frame loop on it.
        drop(self.reader.take());
    }
}

type StderrDrain = std::thread::JoinHandle<std::io::Result<Vec<u8>>>;

struct OutputPump {
    session: crate::capture::recorder::SessionId,
    timeslice: std::time::Duration,
    events: Sender<RecorderEvent>,
    cancelled: Arc<AtomicBool>,
    child: Arc<Mutex<Child>>,
}

impl OutputPump {
    fn emit(&self, ev: RecorderEvent) {
        if !self.cancelled.load(Ordering::SeqCst) {
            let _ = self.events.send(ev);
        }
    }

    fn run(self, mut stdout: impl Read, stderr_drain: StderrDrain) {
        let mut pending = Vec::new();
        let mut buf = vec![0u8; 64 * 1024];
        let mut last_emit = Instant::now();
        let read_err = loop {
            match stdout.read(&mut buf) {
                Ok(0) => break None,
                Ok(n) => pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => break Some(e),
            }
            if last_emit.elapsed() >= self.timeslice && !pending.is_empty() {
                self.emit(RecorderEvent::data(self.session, std::mem::take(&mut pending)));
                last_emit = Instant::now();
            }
        };
        if !pending.is_empty() {
            self.emit(RecorderEvent::data(self.session, pending));
        }

        let status = match self.child.lock() {
            Ok(mut child) => child.wait(),
            Err(_) => Err(std::io::Error::other("ffmpeg child lock poisoned")),
        };
        let stderr_bytes = stderr_drain
            .join()
            .ok()
            .and_then(Result::ok)
            .unwrap_or_default();

        if self.cancelled.load(Ordering::SeqCst) {
            tracing::debug!(session = %self.session, "ffmpeg recorder cancelled");
            return;
        }
        let outcome = match (read_err, status) {
            (Some(e), _) => Err(format!("failed to read ffmpeg output: {e}")),
            (None, Err(e)) => Err(format!("failed to wait for ffmpeg to finish: {e}")),
            (None, Ok(status)) if !status.success() => Err(format!(
                "ffmpeg exited with status {}: {}",
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )),
            (None, Ok(_)) => Ok(()),
        };
        match outcome {
            Ok(()) => self.emit(RecorderEvent::stopped(self.session)),
            Err(msg) => {
                tracing::warn!(session = %self.session, error = %msg, "ffmpeg recorder failed");
                self.emit(RecorderEvent::fault(self.session, msg));
            }
        }
    }
}

fn push_args(
    cmd: &mut Command,
    canvas: Canvas,
    fps: Fps,
    encoder: &str,
    crf: u8,
    timeslice: std::time::Duration,
) {
    cmd.args([
        "-hide_banner",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", canvas.width, canvas.height),
        "-r",
        &format!("{}/{}", fps.num, fps.den),
        "-i",
        "pipe:0",
        "-an",
        // yuv420p needs even dimensions; odd container widths get one padding column.
        "-vf",
        "pad=ceil(iw/2)*2:ceil(ih/2)*2",
        "-c:v",
        encoder,
        "-pix_fmt",
        "yuv420p",
        "-deadline",
        "realtime",
        "-cpu-used",
        "8",
        "-crf",
        &crf.to_string(),
    ]);
    // VP9 treats a zero bitrate as constant quality; VP8 needs a ceiling alongside crf.
    if encoder == VP9_ENCODER {
        cmd.args(["-b:v", "0"]);
    } else {
        cmd.args(["-b:v", "2M"]);
    }
    cmd.args([
        "-f",
        "webm",
        "-cluster_time_limit",
        &timeslice.as_millis().to_string(),
        "pipe:1",
    ]);
}

/// Encoder names listed by `ffmpeg -encoders`, or `None` when the binary cannot be run.
fn probe_encoders(bin: &Path) -> Option<BTreeSet<String>> {
    let output = Command::new(bin)
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        tracing::debug!(bin = %bin.display(), status = %output.status, "ffmpeg probe failed");
        return None;
    }
    Some(parse_encoder_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse the table printed by `ffmpeg -encoders`: a legend, a `------` separator, then one
/// `<flags> <name> <description>` row per encoder.
fn parse_encoder_list(text: &str) -> BTreeSet<String> {
    text.lines()
        .skip_while(|l| !l.trim_start().starts_with("---"))
        .skip(1)
        .filter_map(|l| l.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> TamanResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(TamanError::encode(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for i in 0..3 {
            d[i] = (u16::from(s[i]) + mul_div255_u16(bg[i], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn flatten_straight_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    bg_rgba: [u8; 4],
) -> TamanResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TamanError::encode(
            "flatten_straight_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for i in 0..3 {
            d[i] = (mul_div255_u16(u16::from(s[i]), a) + mul_div255_u16(u16::from(bg_rgba[i]), inv))
                .min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
