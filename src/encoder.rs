//! # Container encoder
//!
//! Writes a [`Container`] back out block by block. Packed descriptor bytes are
//! recomputed from the tables present, everything else is emitted as decoded.

use alloc::fmt;
use alloc::vec::Vec;

use crate::common::{Block, Container, Extension, GraphicControl, ImageBlock, RawExtension, Section};
use crate::io::{self, Write};
use crate::reader::{MAX_CODE_SIZE, MIN_CODE_SIZE};
use crate::traits::{WriteBlocksExt, WriteBytesExt};

/// The container has incorrect properties, making it impossible to encode as a gif.
#[derive(Debug)]
#[non_exhaustive]
pub enum EncodingFormatError {
    /// LZW minimum code size outside `1..=11`.
    InvalidMinCodeSize(u8),
}

impl core::error::Error for EncodingFormatError {}
impl fmt::Display for EncodingFormatError {
    #[cold]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMinCodeSize(size) => {
                write!(fmt, "LZW minimum code size {size} is invalid")
            }
        }
    }
}

/// Encoding error.
#[derive(Debug)]
#[non_exhaustive]
pub enum EncodingError {
    /// Returned if the container is not encodable as a gif.
    Format(EncodingFormatError),
    /// Wraps an I/O error.
    Io(io::IoError),
}

impl fmt::Display for EncodingError {
    #[cold]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => fmt::Display::fmt(err, fmt),
            Self::Format(err) => fmt::Display::fmt(err, fmt),
        }
    }
}

impl core::error::Error for EncodingError {
    #[cold]
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
        }
    }
}

impl From<io::IoError> for EncodingError {
    #[cold]
    fn from(err: io::IoError) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for EncodingError {
    #[cold]
    fn from(err: std::io::Error) -> Self {
        Self::Io(io::IoError::from(err))
    }
}

impl From<EncodingFormatError> for EncodingError {
    #[cold]
    fn from(err: EncodingFormatError) -> Self {
        Self::Format(err)
    }
}

/// GIF encoder.
pub struct Encoder<W: Write> {
    w: W,
}

impl<W: Write> Encoder<W> {
    /// Creates a new encoder writing to `w`.
    pub fn new(w: W) -> Self {
        Self { w }
    }

    /// Writes a whole container, from the signature to the trailer.
    pub fn write_container(&mut self, container: &Container) -> Result<(), EncodingError> {
        // Validate up front so a bad image cannot leave half a file behind.
        for image in container.images() {
            check_min_code_size(image.min_code_size)?;
        }
        self.write_screen_desc(container)?;
        if let Some(ref table) = container.global_color_table {
            self.w.write_color_table(table)?;
        }
        for section in &container.sections {
            match section {
                Section::Control(ctrl) => self.write_control(ctrl)?,
                Section::Extension(ext) => self.write_raw_extension(ext)?,
                Section::Image(image) => self.write_image(image)?,
            }
        }
        self.write_trailer()
    }

    fn write_screen_desc(&mut self, container: &Container) -> Result<(), EncodingError> {
        let writer = &mut self.w;
        writer.write_all(b"GIF")?;
        writer.write_all(container.version.as_bytes())?;
        writer.write_le(container.screen_width)?;
        writer.write_le(container.screen_height)?;
        writer.write_le(container.packed_screen_flags())?;
        writer.write_le(container.background_color_index)?;
        writer.write_le(container.pixel_aspect_ratio)?;
        Ok(())
    }

    fn write_control(&mut self, ctrl: &GraphicControl) -> Result<(), EncodingError> {
        let writer = &mut self.w;
        writer.write_le(Block::Extension as u8)?;
        writer.write_le(Extension::Control as u8)?;
        writer.write_le(4u8)?;
        writer.write_le(ctrl.flags)?;
        writer.write_le(ctrl.delay)?;
        writer.write_le(ctrl.transparent_index)?;
        writer.write_le(0u8)?;
        Ok(())
    }

    /// Writes an extension that was kept verbatim.
    fn write_raw_extension(&mut self, ext: &RawExtension) -> Result<(), EncodingError> {
        let writer = &mut self.w;
        writer.write_le(Block::Extension as u8)?;
        writer.write_le(ext.label.0)?;
        writer.write_sub_blocks(&ext.data)?;
        Ok(())
    }

    fn write_image(&mut self, image: &ImageBlock) -> Result<(), EncodingError> {
        let writer = &mut self.w;
        writer.write_le(Block::Image as u8)?;
        writer.write_le(image.left)?;
        writer.write_le(image.top)?;
        writer.write_le(image.width)?;
        writer.write_le(image.height)?;
        writer.write_le(image.packed_flags())?;
        if let Some(ref table) = image.local_color_table {
            writer.write_color_table(table)?;
        }
        writer.write_le(image.min_code_size)?;
        writer.write_sub_blocks(&image.data)?;
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<(), EncodingError> {
        self.w.write_le(Block::Trailer as u8)?;
        self.w.flush()?;
        Ok(())
    }

    /// Gets a reference to the writer instance used by this encoder.
    pub fn get_ref(&self) -> &W {
        &self.w
    }

    /// Returns the `io::Write` instance used by this encoder
    pub fn into_inner(self) -> W {
        self.w
    }
}

fn check_min_code_size(size: u8) -> Result<(), EncodingFormatError> {
    if (MIN_CODE_SIZE..=MAX_CODE_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(EncodingFormatError::InvalidMinCodeSize(size))
    }
}

/// Encodes a container into a new buffer.
pub fn encode(container: &Container) -> Result<Vec<u8>, EncodingError> {
    let mut encoder = Encoder::new(Vec::new());
    encoder.write_container(container)?;
    Ok(encoder.into_inner())
}
