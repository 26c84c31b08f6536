use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat, RgbaImage};
use physics::CameraImage;

use crate::error::RecordError;

/// GIF quantizer speed, 1 (best) to 30 (fastest).
const GIF_SPEED: i32 = 10;

/// Anything that accepts captured camera frames.
pub trait FrameSink {
    /// # Errors
    ///
    /// [`RecordError::InvalidFrame`] when the pixel buffer does not match the
    /// declared image size.
    fn push(&mut self, frame: CameraImage) -> Result<(), RecordError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered, append-only in-memory frame buffer.
#[derive(Clone, Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<RgbaImage>,
}

impl FrameRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Writes every frame as one animated GIF.
    ///
    /// Each frame is shown for `frame_delay`. `loops` is the GIF loop count,
    /// with 0 meaning loop forever.
    ///
    /// # Errors
    ///
    /// [`RecordError::NoFrames`] if nothing was recorded, [`RecordError::Io`]
    /// if the file cannot be created, and [`RecordError::Image`] on encoding
    /// failure.
    pub fn save_gif(
        &self,
        path: &Path,
        frame_delay: Duration,
        loops: u16,
    ) -> Result<(), RecordError> {
        if self.frames.is_empty() {
            return Err(RecordError::NoFrames);
        }
        let file = create(path)?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_SPEED);
        encoder.set_repeat(if loops == 0 {
            Repeat::Infinite
        } else {
            Repeat::Finite(loops)
        })?;

        let delay = Delay::from_saturating_duration(frame_delay);
        encoder.encode_frames(
            self.frames
                .iter()
                .map(|img| Frame::from_parts(img.clone(), 0, 0, delay)),
        )?;
        tracing::info!(
            "wrote {} frames to {} ({} ms per frame)",
            self.frames.len(),
            path.display(),
            frame_delay.as_millis()
        );
        Ok(())
    }

    /// Writes a single frame as a PNG.
    ///
    /// # Errors
    ///
    /// [`RecordError::FrameOutOfRange`] for an index past the end, otherwise
    /// as [`FrameRecorder::save_gif`].
    pub fn save_frame_png(&self, index: usize, path: &Path) -> Result<(), RecordError> {
        let frame = self.frames.get(index).ok_or(RecordError::FrameOutOfRange {
            index,
            len: self.frames.len(),
        })?;
        let mut writer = BufWriter::new(create(path)?);
        frame.write_to(&mut writer, ImageFormat::Png)?;
        Ok(())
    }
}

impl FrameSink for FrameRecorder {
    fn push(&mut self, frame: CameraImage) -> Result<(), RecordError> {
        let CameraImage {
            width,
            height,
            rgba,
        } = frame;
        let len = rgba.len();
        let image = RgbaImage::from_raw(width, height, rgba).ok_or(RecordError::InvalidFrame {
            width,
            height,
            len,
        })?;
        self.frames.push(image);
        Ok(())
    }

    fn len(&self) -> usize {
        self.frames.len()
    }
}

fn create(path: &Path) -> Result<File, RecordError> {
    File::create(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `<prefix>-YYYYmmdd-HHMMSS.<extension>` in local time.
#[must_use]
pub fn timestamped_file_name(prefix: &str, extension: &str) -> String {
    format!(
        "{prefix}-{}.{extension}",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}
