#![allow(dead_code)]

use weezl::{decode::Decoder as LzwDecoder, encode::Encoder as LzwEncoder, BitOrder};

/// Palette used by most fixtures: black, red, green, blue.
pub const RGBK: [[u8; 3]; 4] = [[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];

/// One frame of a fixture file.
#[derive(Clone)]
pub struct FrameSpec {
    pub width: u16,
    pub height: u16,
    pub indices: Vec<u8>,
    pub local_palette: Option<Vec<[u8; 3]>>,
    pub interlaced: bool,
    pub transparent: Option<u8>,
}

impl FrameSpec {
    pub fn new(width: u16, height: u16) -> Self {
        let indices = (0..usize::from(width) * usize::from(height))
            .map(|i| (i % 4) as u8)
            .collect();
        Self {
            width,
            height,
            indices,
            local_palette: None,
            interlaced: false,
            transparent: None,
        }
    }
}

/// Assembles GIF files byte by byte, with real LZW data from `weezl`.
#[derive(Clone)]
pub struct GifBuilder {
    pub version: &'static [u8; 3],
    pub width: u16,
    pub height: u16,
    pub palette: Option<Vec<[u8; 3]>>,
    pub comment: Option<Vec<u8>>,
    pub app: Option<Vec<u8>>,
    /// Payload bytes per data sub-block, at most 255.
    pub chunk_len: usize,
    pub frames: Vec<FrameSpec>,
}

impl GifBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            version: b"89a",
            width,
            height,
            palette: Some(RGBK.to_vec()),
            comment: None,
            app: None,
            chunk_len: 255,
            frames: vec![FrameSpec::new(width, height)],
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"GIF");
        out.extend_from_slice(self.version);
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        match self.palette {
            Some(ref palette) => {
                out.push(0x80 | 0x70 | size_bits(palette.len()));
                out.extend_from_slice(&[0, 0]);
                push_table(&mut out, palette);
            }
            None => out.extend_from_slice(&[0, 0, 0]),
        }
        if let Some(ref app) = self.app {
            out.extend_from_slice(&[0x21, 0xFF]);
            push_sub_blocks(&mut out, app, 255);
        }
        if let Some(ref comment) = self.comment {
            out.extend_from_slice(&[0x21, 0xFE]);
            push_sub_blocks(&mut out, comment, 255);
        }
        for frame in &self.frames {
            if let Some(index) = frame.transparent {
                out.extend_from_slice(&[0x21, 0xF9, 4, 0x01, 10, 0, index, 0]);
            }
            out.push(0x2C);
            for v in [0u16, 0, frame.width, frame.height] {
                out.extend_from_slice(&v.to_le_bytes());
            }
            let mut flags = if frame.interlaced { 0x40 } else { 0 };
            if let Some(ref palette) = frame.local_palette {
                flags |= 0x80 | size_bits(palette.len());
            }
            out.push(flags);
            if let Some(ref palette) = frame.local_palette {
                push_table(&mut out, palette);
            }
            let min_code_size = min_code_size(&frame.indices);
            out.push(min_code_size);
            push_sub_blocks(&mut out, &lzw_encode(min_code_size, &frame.indices), self.chunk_len);
        }
        out.push(0x3B);
        out
    }
}

fn size_bits(len: usize) -> u8 {
    (len.next_power_of_two().trailing_zeros() - 1) as u8
}

fn push_table(out: &mut Vec<u8>, palette: &[[u8; 3]]) {
    for rgb in palette {
        out.extend_from_slice(rgb);
    }
}

fn push_sub_blocks(out: &mut Vec<u8>, payload: &[u8], chunk_len: usize) {
    for chunk in payload.chunks(chunk_len) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
}

pub fn min_code_size(indices: &[u8]) -> u8 {
    let max = indices.iter().copied().max().unwrap_or(0);
    (u32::from(max) + 1).max(4).next_power_of_two().trailing_zeros() as u8
}

pub fn lzw_encode(min_code_size: u8, indices: &[u8]) -> Vec<u8> {
    LzwEncoder::new(BitOrder::Lsb, min_code_size)
        .encode(indices)
        .unwrap()
}

pub fn lzw_decode(min_code_size: u8, data: &[u8]) -> Vec<u8> {
    LzwDecoder::new(BitOrder::Lsb, min_code_size)
        .decode(data)
        .unwrap()
}
