//! # GIF container decoder
//!
//! Parses a complete file held in memory into a [`Container`]. Pixel data is
//! collected as raw sub-blocks and never decompressed.

use alloc::fmt;
use alloc::vec::Vec;

use log::{debug, warn};

use crate::common::{
    table_len, AnyExtension, Block, ColorTable, Container, Extension, GraphicControl, ImageBlock,
    RawExtension, Section, SubBlocks, Version,
};

/// Smallest LZW minimum code size accepted in an image block.
pub(crate) const MIN_CODE_SIZE: u8 = 1;
/// Largest LZW minimum code size accepted in an image block.
pub(crate) const MAX_CODE_SIZE: u8 = 11;

/// The byte stream is not a well-formed GIF.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodingFormatError {
    /// The file does not start with `GIF`.
    InvalidSignature,
    /// The version after `GIF` is neither `87a` nor `89a`.
    UnsupportedVersion([u8; 3]),
    /// The stream ended in the middle of a block.
    UnexpectedEof,
    /// A color table of `declared` entries does not fit in the remaining stream.
    InvalidColorTableSize {
        /// Number of entries the packed size bits announce.
        declared: usize,
    },
    /// The logical screen has zero width or height.
    EmptyScreen,
    /// A byte that introduces no known block.
    UnknownBlock(u8),
    /// LZW minimum code size outside `1..=11`.
    InvalidMinCodeSize(u8),
    /// The block sequence ended without a trailer.
    MissingTrailer,
    /// Bytes follow the trailer and the decoder was told not to allow them.
    TrailingData,
}

impl core::error::Error for DecodingFormatError {}
impl fmt::Display for DecodingFormatError {
    #[cold]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature => fmt.write_str("malformed GIF signature"),
            Self::UnsupportedVersion(v) => {
                write!(fmt, "unsupported GIF version \"{}\"", v.escape_ascii())
            }
            Self::UnexpectedEof => fmt.write_str("file is truncated"),
            Self::InvalidColorTableSize { declared } => write!(
                fmt,
                "color table of {declared} entries does not fit in the file"
            ),
            Self::EmptyScreen => fmt.write_str("logical screen has zero width or height"),
            Self::UnknownBlock(byte) => write!(fmt, "unknown block type {byte:#04x}"),
            Self::InvalidMinCodeSize(size) => write!(fmt, "invalid LZW minimum code size {size}"),
            Self::MissingTrailer => fmt.write_str("missing trailer"),
            Self::TrailingData => fmt.write_str("unexpected data after trailer"),
        }
    }
}

/// Decoding error, with the byte offset at which decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingError {
    kind: DecodingFormatError,
    offset: usize,
}

impl DecodingError {
    #[cold]
    fn new(kind: DecodingFormatError, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &DecodingFormatError {
        &self.kind
    }

    /// Offset into the input where the malformed structure starts.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for DecodingError {
    #[cold]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} (at byte {})", self.kind, self.offset)
    }
}

impl core::error::Error for DecodingError {
    #[cold]
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Options for decoding GIF files.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    allow_trailing_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    /// Creates a new decoder builder
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            allow_trailing_data: true,
        }
    }

    /// Configure whether bytes after the trailer are dropped (the default) or rejected.
    ///
    /// Many encoders pad their output, so strict checking is off unless asked for.
    pub fn allow_trailing_data(&mut self, allow: bool) -> &mut Self {
        self.allow_trailing_data = allow;
        self
    }

    /// Decodes a complete GIF file.
    pub fn decode(&self, bytes: &[u8]) -> Result<Container, DecodingError> {
        let mut cursor = Cursor::new(bytes);
        let container = parse_container(&mut cursor)?;
        if !cursor.is_empty() {
            if !self.allow_trailing_data {
                return Err(DecodingError::new(
                    DecodingFormatError::TrailingData,
                    cursor.pos,
                ));
            }
            warn!(
                "ignoring {} bytes after the trailer",
                bytes.len() - cursor.pos
            );
        }
        Ok(container)
    }
}

/// Decodes a complete GIF file with default options.
pub fn decode(bytes: &[u8]) -> Result<Container, DecodingError> {
    DecodeOptions::new().decode(bytes)
}

/// Reads little endian values out of the input slice.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn eof(&self) -> DecodingError {
        DecodingError::new(DecodingFormatError::UnexpectedEof, self.buf.len())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodingError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| self.eof())?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, DecodingError> {
        let byte = *self.buf.get(self.pos).ok_or_else(|| self.eof())?;
        self.pos += 1;
        Ok(byte)
    }

    fn le_u16(&mut self) -> Result<u16, DecodingError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Collects sub-blocks up to and including the zero-length terminator.
    fn sub_blocks(&mut self) -> Result<SubBlocks, DecodingError> {
        let start = self.pos;
        loop {
            let len = self.u8()?;
            if len == 0 {
                break;
            }
            self.take(usize::from(len))?;
        }
        Ok(SubBlocks::from_raw(self.buf[start..self.pos].to_vec()))
    }

    fn color_table(&mut self, flags: u8) -> Result<ColorTable, DecodingError> {
        let start = self.pos;
        let declared = table_len(flags);
        let invalid = || {
            DecodingError::new(
                DecodingFormatError::InvalidColorTableSize { declared },
                start,
            )
        };
        let rgb = self.take(declared * 3).map_err(|_| invalid())?;
        ColorTable::from_rgb(rgb).ok_or_else(invalid)
    }
}

fn parse_container(cursor: &mut Cursor<'_>) -> Result<Container, DecodingError> {
    let signature = cursor.take(6)?;
    if &signature[..3] != b"GIF" {
        return Err(DecodingError::new(DecodingFormatError::InvalidSignature, 0));
    }
    let version = match &signature[3..] {
        b"87a" => Version::V87a,
        b"89a" => Version::V89a,
        other => {
            let mut v = [0; 3];
            v.copy_from_slice(other);
            return Err(DecodingError::new(
                DecodingFormatError::UnsupportedVersion(v),
                3,
            ));
        }
    };

    let screen_width = cursor.le_u16()?;
    let screen_height = cursor.le_u16()?;
    if screen_width == 0 || screen_height == 0 {
        return Err(DecodingError::new(DecodingFormatError::EmptyScreen, 6));
    }
    let screen_flags = cursor.u8()?;
    let background_color_index = cursor.u8()?;
    let pixel_aspect_ratio = cursor.u8()?;
    let global_color_table = if screen_flags & Container::GLOBAL_TABLE != 0 {
        Some(cursor.color_table(screen_flags)?)
    } else {
        None
    };
    debug!(
        "{:?} screen {}x{}, global table: {:?}",
        version,
        screen_width,
        screen_height,
        global_color_table.as_ref().map(ColorTable::len)
    );

    let mut sections = Vec::new();
    loop {
        let offset = cursor.pos;
        if cursor.is_empty() {
            return Err(DecodingError::new(
                DecodingFormatError::MissingTrailer,
                offset,
            ));
        }
        let introducer = cursor.u8()?;
        match Block::from_u8(introducer) {
            Some(Block::Trailer) => break,
            Some(Block::Extension) => sections.push(parse_extension(cursor)?),
            Some(Block::Image) => sections.push(Section::Image(parse_image(cursor)?)),
            None => {
                return Err(DecodingError::new(
                    DecodingFormatError::UnknownBlock(introducer),
                    offset,
                ))
            }
        }
    }

    Ok(Container {
        version,
        screen_width,
        screen_height,
        screen_flags,
        background_color_index,
        pixel_aspect_ratio,
        global_color_table,
        sections,
    })
}

fn parse_extension(cursor: &mut Cursor<'_>) -> Result<Section, DecodingError> {
    let offset = cursor.pos - 1;
    let label = AnyExtension(cursor.u8()?);
    let data = cursor.sub_blocks()?;
    if label.into_known() == Some(Extension::Control) {
        // A well formed control block is one 4 byte sub-block plus the terminator.
        if let [4, flags, d0, d1, transparent_index, 0] = *data.as_bytes() {
            debug!("control extension at {offset}, flags {flags:#04x}");
            return Ok(Section::Control(GraphicControl {
                flags,
                delay: u16::from_le_bytes([d0, d1]),
                transparent_index,
            }));
        }
        warn!("malformed control extension at {offset}, keeping it verbatim");
    } else {
        debug!("extension {:#04x} at {offset}", label.0);
    }
    Ok(Section::Extension(RawExtension { label, data }))
}

fn parse_image(cursor: &mut Cursor<'_>) -> Result<ImageBlock, DecodingError> {
    let left = cursor.le_u16()?;
    let top = cursor.le_u16()?;
    let width = cursor.le_u16()?;
    let height = cursor.le_u16()?;
    let flags = cursor.u8()?;
    let local_color_table = if flags & ImageBlock::LOCAL_TABLE != 0 {
        Some(cursor.color_table(flags)?)
    } else {
        None
    };
    let code_size_offset = cursor.pos;
    let min_code_size = cursor.u8()?;
    if !(MIN_CODE_SIZE..=MAX_CODE_SIZE).contains(&min_code_size) {
        return Err(DecodingError::new(
            DecodingFormatError::InvalidMinCodeSize(min_code_size),
            code_size_offset,
        ));
    }
    let data = cursor.sub_blocks()?;
    debug!(
        "image {}x{} at ({}, {}), {} bytes of LZW data",
        width,
        height,
        left,
        top,
        data.as_bytes().len()
    );
    Ok(ImageBlock {
        left,
        top,
        width,
        height,
        flags,
        local_color_table,
        min_code_size,
        data,
    })
}
