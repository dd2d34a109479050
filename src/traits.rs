//! Traits used in this library
use crate::common::{ColorTable, SubBlocks};
use crate::io::{Result, Write};

/// Writer extension to write little endian data
pub(crate) trait WriteBytesExt<T> {
    /// Writes `T` to a bytes stream. Least significant byte first.
    fn write_le(&mut self, n: T) -> Result<()>;
}

impl<W: Write + ?Sized> WriteBytesExt<u8> for W {
    #[inline(always)]
    fn write_le(&mut self, n: u8) -> Result<()> {
        self.write_all(&[n])
    }
}

impl<W: Write + ?Sized> WriteBytesExt<u16> for W {
    #[inline]
    fn write_le(&mut self, n: u16) -> Result<()> {
        self.write_all(&n.to_le_bytes())
    }
}

/// Writer extension for the variable length parts of a GIF
pub(crate) trait WriteBlocksExt {
    /// Writes the RGB triples of a table, without any size prefix.
    fn write_color_table(&mut self, table: &ColorTable) -> Result<()>;

    /// Writes framed sub-blocks verbatim, terminator included.
    fn write_sub_blocks(&mut self, blocks: &SubBlocks) -> Result<()>;
}

impl<W: Write + ?Sized> WriteBlocksExt for W {
    fn write_color_table(&mut self, table: &ColorTable) -> Result<()> {
        for rgb in table.entries() {
            self.write_all(rgb)?;
        }
        Ok(())
    }

    #[inline]
    fn write_sub_blocks(&mut self, blocks: &SubBlocks) -> Result<()> {
        self.write_all(blocks.as_bytes())
    }
}
