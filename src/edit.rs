//! Metadata edits and queries on a decoded [`Container`].
//!
//! Nothing here touches the compressed pixel data.

use alloc::vec::Vec;

use crate::common::{ColorTable, Container, GraphicControl, ImageBlock, Section, Version};

/// One row of a color table listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Position in the table.
    pub index: u8,
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

/// Summary of a container, as reported by [`Container::describe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Description {
    /// Logical screen width.
    pub width: u16,
    /// Logical screen height.
    pub height: u16,
    /// Entries in the active color table.
    pub color_count: usize,
    /// Transparent index of the first image.
    pub transparent_index: Option<u8>,
    /// Whether the first image is interlaced.
    pub interlaced: bool,
}

impl Container {
    /// Sets or clears the interlace flag of every image.
    ///
    /// Only the descriptor bit changes, the pixel data keeps its row order.
    pub fn set_interlace(&mut self, on: bool) {
        for section in &mut self.sections {
            if let Section::Image(image) = section {
                if on {
                    image.flags |= ImageBlock::INTERLACED;
                } else {
                    image.flags &= !ImageBlock::INTERLACED;
                }
            }
        }
    }

    /// Sets or clears the transparent color index of every image.
    ///
    /// An image without a control extension gets a new one when an index is
    /// set, which also lifts the file to `GIF89a`. Clearing keeps existing
    /// control extensions and only drops their transparent flag.
    ///
    /// The index is not checked against the size of any color table.
    pub fn set_transparent(&mut self, index: Option<u8>) {
        let Some(index) = index else {
            for section in &mut self.sections {
                if let Section::Control(ctrl) = section {
                    ctrl.set_transparent(None);
                }
            }
            return;
        };

        // Images not preceded by a control extension since the previous image.
        let mut missing = Vec::new();
        let mut governed = false;
        for (pos, section) in self.sections.iter_mut().enumerate() {
            match section {
                Section::Control(ctrl) => {
                    ctrl.set_transparent(Some(index));
                    governed = true;
                }
                Section::Image(_) => {
                    if !governed {
                        missing.push(pos);
                    }
                    governed = false;
                }
                Section::Extension(_) => {}
            }
        }
        for &pos in missing.iter().rev() {
            self.sections.insert(
                pos,
                Section::Control(GraphicControl::with_transparent(Some(index))),
            );
        }
        if !missing.is_empty() {
            self.version = self.version.max(Version::V89a);
        }
    }

    /// The table that colors the first image: its local table, else the global one.
    #[must_use]
    pub fn active_color_table(&self) -> Option<&ColorTable> {
        self.images()
            .next()
            .and_then(|image| image.local_color_table.as_ref())
            .or(self.global_color_table.as_ref())
    }

    /// Lists the active color table in index order.
    #[must_use]
    pub fn list_colors(&self) -> Vec<PaletteEntry> {
        let entries = self.active_color_table().map_or(&[][..], ColorTable::entries);
        (0..=u8::MAX)
            .zip(entries)
            .map(|(index, &[red, green, blue])| PaletteEntry {
                index,
                red,
                green,
                blue,
            })
            .collect()
    }

    /// Transparent index in effect for the first image.
    #[must_use]
    pub fn transparent_index(&self) -> Option<u8> {
        let mut control = None;
        for section in &self.sections {
            match section {
                Section::Control(ctrl) => control = Some(ctrl),
                Section::Image(_) => return control.and_then(GraphicControl::transparent),
                Section::Extension(_) => {}
            }
        }
        None
    }

    /// Whether the first image is interlaced.
    #[must_use]
    pub fn interlaced(&self) -> bool {
        self.images().next().is_some_and(ImageBlock::interlaced)
    }

    /// Snapshot of dimensions, palette size, transparency and interlacing.
    #[must_use]
    pub fn describe(&self) -> Description {
        Description {
            width: self.screen_width,
            height: self.screen_height,
            color_count: self.active_color_table().map_or(0, ColorTable::len),
            transparent_index: self.transparent_index(),
            interlaced: self.interlaced(),
        }
    }
}
