use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use physics::CameraImage;
use render::{FrameRecorder, FrameSink, RecordError};

fn recorder_with(frames: u8) -> FrameRecorder {
    let mut recorder = FrameRecorder::new();
    for i in 0..frames {
        recorder
            .push(CameraImage::filled(16, 8, [i * 40, 100, 200, 255]))
            .unwrap();
    }
    recorder
}

#[test]
fn gif_holds_one_frame_per_capture() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.gif");
    let recorder = recorder_with(4);
    recorder
        .save_gif(&path, Duration::from_millis(250), 1)
        .unwrap();

    let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 4);
    let (numer, denom) = frames[0].delay().numer_denom_ms();
    assert_eq!(numer / denom, 250);
    assert_eq!(frames[0].buffer().dimensions(), (16, 8));
}

#[test]
fn infinite_loop_gif_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.gif");
    recorder_with(2)
        .save_gif(&path, Duration::from_millis(50), 0)
        .unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn single_frame_png_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let recorder = recorder_with(3);
    recorder.save_frame_png(2, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (16, 8));
    assert_eq!(img.get_pixel(0, 0).0, [80, 100, 200, 255]);
}

#[test]
fn png_index_past_end_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = recorder_with(1)
        .save_frame_png(5, &dir.path().join("x.png"))
        .unwrap_err();
    assert!(matches!(err, RecordError::FrameOutOfRange { index: 5, len: 1 }));
}

#[test]
fn unwritable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("run.gif");
    let err = recorder_with(1)
        .save_gif(&path, Duration::from_millis(50), 1)
        .unwrap_err();
    assert!(matches!(err, RecordError::Io { .. }), "{err}");
}
