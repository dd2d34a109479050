//! In-memory model of a decoded GIF container.

use alloc::vec::Vec;

/// Known GIF block types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Block {
    /// Image block.
    Image = 0x2C,
    /// Extension block.
    Extension = 0x21,
    /// Image trailer.
    Trailer = 0x3B,
}

impl Block {
    /// Converts `u8` to `Option<Self>`
    #[must_use]
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            0x2C => Some(Self::Image),
            0x21 => Some(Self::Extension),
            0x3B => Some(Self::Trailer),
            _ => None,
        }
    }
}

/// Known GIF extension labels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Extension {
    /// Plain Text extension.
    Text = 0x01,
    /// Control extension, carries the transparent color index.
    Control = 0xF9,
    /// Comment extension.
    Comment = 0xFE,
    /// Application extension.
    Application = 0xFF,
}

/// An extension label, known or not.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AnyExtension(pub u8);

impl From<Extension> for AnyExtension {
    fn from(ext: Extension) -> Self {
        Self(ext as u8)
    }
}

impl AnyExtension {
    /// Returns the known extension for this label, if any.
    #[must_use]
    pub fn into_known(self) -> Option<Extension> {
        match self.0 {
            0x01 => Some(Extension::Text),
            0xF9 => Some(Extension::Control),
            0xFE => Some(Extension::Comment),
            0xFF => Some(Extension::Application),
            _ => None,
        }
    }
}

/// GIF version found in the header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Version {
    /// `GIF87a`
    V87a,
    /// `GIF89a`
    V89a,
}

impl Version {
    /// The three version bytes following `GIF`.
    #[must_use]
    pub fn as_bytes(self) -> &'static [u8; 3] {
        match self {
            Self::V87a => b"87a",
            Self::V89a => b"89a",
        }
    }
}

/// A palette of RGB entries.
///
/// The number of entries is always a power of two between 2 and 256, which is
/// the only shape the packed size bits of a descriptor can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<[u8; 3]>,
}

impl ColorTable {
    /// Largest table the format can describe.
    pub const MAX_LEN: usize = 256;

    /// Creates a table, or `None` if the entry count is not a power of two in `2..=256`.
    #[must_use]
    pub fn new(entries: Vec<[u8; 3]>) -> Option<Self> {
        let len = entries.len();
        if len < 2 || len > Self::MAX_LEN || !len.is_power_of_two() {
            return None;
        }
        Some(Self { entries })
    }

    /// Creates a table from packed `[r, g, b, r, g, b, ...]` bytes.
    #[must_use]
    pub fn from_rgb(rgb: &[u8]) -> Option<Self> {
        if rgb.len() % 3 != 0 {
            return None;
        }
        Self::new(rgb.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false, tables hold at least two entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in index order.
    #[must_use]
    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }

    /// The exponent stored in the low three bits of a packed descriptor byte.
    pub(crate) fn size_bits(&self) -> u8 {
        flag_size(self.entries.len())
    }
}

// Color table size converted to flag bits
pub(crate) fn flag_size(size: usize) -> u8 {
    (size.clamp(2, 255).next_power_of_two().trailing_zeros() - 1) as u8
}

/// Table length encoded by the low three bits of a packed descriptor byte.
pub(crate) fn table_len(flags: u8) -> usize {
    2 << (flags & 0b0000_0111)
}

/// A run of data sub-blocks, kept in its framed on-disk form.
///
/// The bytes are the length-prefixed sub-blocks (at most 255 bytes each)
/// followed by the zero-length terminator, exactly as they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubBlocks {
    raw: Vec<u8>,
}

impl Default for SubBlocks {
    fn default() -> Self {
        Self { raw: vec![0] }
    }
}

impl SubBlocks {
    /// Frames `payload` into full 255 byte sub-blocks plus a shorter last one.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(payload.len() + payload.len() / 0xFF + 2);
        for chunk in payload.chunks(0xFF) {
            raw.push(chunk.len() as u8);
            raw.extend_from_slice(chunk);
        }
        raw.push(0);
        Self { raw }
    }

    /// Wraps bytes that are already known to be well framed.
    pub(crate) fn from_raw(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    /// The framed bytes, terminator included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Iterates over the payload of each sub-block.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let mut rest = &self.raw[..];
        core::iter::from_fn(move || {
            let (&len, tail) = rest.split_first()?;
            if len == 0 {
                return None;
            }
            let (chunk, tail) = tail.split_at(usize::from(len).min(tail.len()));
            rest = tail;
            Some(chunk)
        })
    }

    /// Concatenated payload of all sub-blocks.
    #[must_use]
    pub fn payload(&self) -> Vec<u8> {
        self.chunks().flatten().copied().collect()
    }
}

/// The graphic control extension that precedes an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicControl {
    /// Packed flags: disposal method, user input and the transparent flag.
    pub flags: u8,
    /// Frame delay in units of 10 ms.
    pub delay: u16,
    /// Transparent color index, meaningful only while the flag is set.
    pub transparent_index: u8,
}

impl GraphicControl {
    pub(crate) const TRANSPARENT: u8 = 0b0000_0001;

    /// A control block with nothing set but the given transparency.
    #[must_use]
    pub fn with_transparent(index: Option<u8>) -> Self {
        let mut ctrl = Self {
            flags: 0,
            delay: 0,
            transparent_index: 0,
        };
        ctrl.set_transparent(index);
        ctrl
    }

    /// The transparent color index, if the flag is set.
    #[must_use]
    pub fn transparent(&self) -> Option<u8> {
        if self.flags & Self::TRANSPARENT != 0 {
            Some(self.transparent_index)
        } else {
            None
        }
    }

    /// Sets or clears the transparent flag. Clearing leaves the index byte alone.
    pub fn set_transparent(&mut self, index: Option<u8>) {
        match index {
            Some(index) => {
                self.flags |= Self::TRANSPARENT;
                self.transparent_index = index;
            }
            None => self.flags &= !Self::TRANSPARENT,
        }
    }
}

/// An extension block that is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtension {
    /// Extension label.
    pub label: AnyExtension,
    /// The extension's sub-blocks.
    pub data: SubBlocks,
}

/// An image descriptor together with its color table and compressed pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    /// Offset from the left edge of the logical screen.
    pub left: u16,
    /// Offset from the top edge of the logical screen.
    pub top: u16,
    /// Image width.
    pub width: u16,
    /// Image height.
    pub height: u16,
    /// Packed descriptor byte. Table presence and size bits are rewritten from
    /// `local_color_table` when encoding.
    pub flags: u8,
    /// Palette overriding the global one for this image.
    pub local_color_table: Option<ColorTable>,
    /// LZW minimum code size.
    pub min_code_size: u8,
    /// LZW-compressed indices, never decompressed by this crate.
    pub data: SubBlocks,
}

impl ImageBlock {
    pub(crate) const LOCAL_TABLE: u8 = 0b1000_0000;
    pub(crate) const INTERLACED: u8 = 0b0100_0000;
    pub(crate) const TABLE_SIZE: u8 = 0b0000_0111;

    /// Whether rows are stored in interlaced order.
    #[must_use]
    pub fn interlaced(&self) -> bool {
        self.flags & Self::INTERLACED != 0
    }

    /// Descriptor byte as written to disk.
    pub(crate) fn packed_flags(&self) -> u8 {
        match self.local_color_table {
            Some(ref table) => {
                (self.flags & !Self::TABLE_SIZE) | Self::LOCAL_TABLE | table.size_bits()
            }
            None => self.flags & !Self::LOCAL_TABLE,
        }
    }
}

/// One entry of the block sequence between the header and the trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// Graphic control extension.
    Control(GraphicControl),
    /// Any other extension.
    Extension(RawExtension),
    /// Image descriptor and data.
    Image(ImageBlock),
}

/// A decoded GIF file.
///
/// Only [`decode`](crate::decode) creates containers. Metadata is edited in
/// place with [`set_interlace`](Container::set_interlace) and
/// [`set_transparent`](Container::set_transparent), and the result is written
/// back with [`encode`](crate::encode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub(crate) version: Version,
    pub(crate) screen_width: u16,
    pub(crate) screen_height: u16,
    pub(crate) screen_flags: u8,
    pub(crate) background_color_index: u8,
    pub(crate) pixel_aspect_ratio: u8,
    pub(crate) global_color_table: Option<ColorTable>,
    pub(crate) sections: Vec<Section>,
}

impl Container {
    pub(crate) const GLOBAL_TABLE: u8 = 0b1000_0000;
    pub(crate) const TABLE_SIZE: u8 = 0b0000_0111;

    /// File format version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Logical screen width.
    #[must_use]
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }

    /// Logical screen height.
    #[must_use]
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }

    /// Background color index into the global table.
    #[must_use]
    pub fn background_color_index(&self) -> u8 {
        self.background_color_index
    }

    /// Pixel aspect ratio byte, zero when unspecified.
    #[must_use]
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }

    /// The global color table, if the file has one.
    #[must_use]
    pub fn global_color_table(&self) -> Option<&ColorTable> {
        self.global_color_table.as_ref()
    }

    /// Blocks between the header and the trailer, in file order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All image blocks in file order.
    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> + '_ {
        self.sections.iter().filter_map(|section| match section {
            Section::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Logical screen descriptor byte as written to disk.
    pub(crate) fn packed_screen_flags(&self) -> u8 {
        match self.global_color_table {
            Some(ref table) => {
                (self.screen_flags & !Self::TABLE_SIZE) | Self::GLOBAL_TABLE | table.size_bits()
            }
            None => self.screen_flags & !Self::GLOBAL_TABLE,
        }
    }
}
