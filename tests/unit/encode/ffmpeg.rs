use super::*;

const ENCODERS_SAMPLE: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC
 V....D libvpx               libvpx VP8 (codec vp8)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 A....D libopus              libopus Opus
";

#[test]
fn encoder_list_parses_names_after_separator() {
    let names = parse_encoder_list(ENCODERS_SAMPLE);
    assert!(names.contains("libvpx"));
    assert!(names.contains("libvpx-vp9"));
    assert!(names.contains("libopus"));
    assert!(!names.contains("="));
    assert_eq!(names.len(), 4);
}

#[test]
fn missing_binary_reports_no_capability() {
    let backend = FfmpegBackend::new(
        FfmpegBackendOpts::default().with_ffmpeg_bin("/nonexistent/taman-ffmpeg"),
    );
    assert!(!backend.is_available());
    assert!(!backend.is_type_supported("video/webm;codecs=vp9"));
    assert!(!backend.is_type_supported(DEFAULT_MIME_TYPE));
}

#[test]
fn probe_result_is_cached() {
    let backend = FfmpegBackend::new(
        FfmpegBackendOpts::default().with_ffmpeg_bin("/nonexistent/taman-ffmpeg"),
    );
    let _ = backend.is_available();
    assert!(backend.encoders.get().is_some());
}

#[test]
fn opts_builders_clamp_and_store() {
    let opts = FfmpegBackendOpts::default()
        .with_crf(200)
        .with_bg_rgba([1, 2, 3, 255])
        .with_ffmpeg_bin("ff");
    assert_eq!(opts.crf, 63);
    assert_eq!(opts.bg_rgba, [1, 2, 3, 255]);
    assert_eq!(opts.ffmpeg_bin, PathBuf::from("ff"));
}

#[test]
fn args_pad_odd_sizes_and_target_webm() {
    let mut cmd = Command::new("ffmpeg");
    push_args(
        &mut cmd,
        Canvas {
            width: 321,
            height: 360,
        },
        Fps::new(60, 1).unwrap(),
        VP9_ENCODER,
        32,
        std::time::Duration::from_millis(200),
    );
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let joined = args.join(" ");
    assert!(joined.contains("-s 321x360"));
    assert!(joined.contains("-r 60/1"));
    assert!(joined.contains("pad=ceil(iw/2)*2:ceil(ih/2)*2"));
    assert!(joined.contains("-c:v libvpx-vp9"));
    assert!(joined.contains("-b:v 0"));
    assert!(joined.contains("-cluster_time_limit 200"));
    assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_straight_half_red_over_black() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_straight_over_bg_to_opaque_rgba8(&mut dst, &src, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0; 4], [0; 4]).is_err());
}
