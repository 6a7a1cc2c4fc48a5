//! TPK container writing.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use txpk_common::{IntoBytes, PatchWriter};

use crate::catalog::Catalog;
use crate::header::{ContainerHeader, DATA_ALIGN, EXT_INFO_HEADER_SIZE, LEVEL_PAD, SECTION_PAD};
use crate::layout::Layout;
use crate::{Error, PackOptions, Result};

/// Summary of a written container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    /// Directory entries written.
    pub textures: usize,
    /// Directory entries without data.
    pub placeholders: usize,
    /// Offset table slots written.
    pub slots: usize,
    /// Offsets that had to be patched because the stream drifted from the plan.
    pub offset_mismatches: usize,
    /// Empty levels written as zero-filled placeholders.
    pub zero_length_levels: usize,
    /// Final container length.
    pub total_size: u64,
}

/// Writes a planned container to a seekable stream.
///
/// The container is written from the start of the stream. Every offset is
/// taken from the [`Layout`]; the writer checks the stream position against
/// the plan at each data block, name and at the end, and patches the
/// affected field in place if they disagree.
#[derive(Debug)]
pub struct ContainerWriter<W> {
    out: PatchWriter<W>,
    stats: PackStats,
}

impl<W: Write + Seek> ContainerWriter<W> {
    pub fn new(mut inner: W) -> Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            out: PatchWriter::new(inner)?,
            stats: PackStats::default(),
        })
    }

    /// Write `catalog` following `layout`, returning the stream.
    pub fn write(mut self, catalog: &Catalog, layout: &Layout) -> Result<(W, PackStats)> {
        check_layout(catalog, layout)?;

        self.stats.textures = catalog.len();
        self.stats.placeholders = catalog.textures().iter().filter(|t| t.is_placeholder()).count();
        self.stats.slots = layout.slots.len();

        self.write_header(layout)?;
        self.write_offset_table(layout)?;
        self.write_data(catalog, layout)?;
        if layout.ext_info.is_some() {
            self.write_ext_info(layout)?;
        }
        self.finalize(layout)?;

        self.out.flush()?;
        let stats = self.stats;
        Ok((self.out.into_inner(), stats))
    }

    fn write_header(&mut self, layout: &Layout) -> Result<()> {
        self.out.write_bytes(layout.header.as_bytes())?;
        for entry in &layout.directory {
            self.out.write_bytes(entry.as_bytes())?;
        }
        Ok(())
    }

    fn write_offset_table(&mut self, layout: &Layout) -> Result<()> {
        for slot in &layout.slots {
            self.out.write_u32(slot.data_offset)?;
        }
        self.out.pad_to(DATA_ALIGN, SECTION_PAD)?;
        Ok(())
    }

    fn write_data(&mut self, catalog: &Catalog, layout: &Layout) -> Result<()> {
        // Slot counts were checked against the layout before writing began.
        let payloads = catalog.textures().iter().flat_map(|texture| {
            texture
                .slots()
                .map(move |(face, level, bytes)| (texture, face, level, bytes))
        });

        for (slot, (texture, face, level, bytes)) in layout.slots.iter().zip(payloads) {
            let position = self.out.position();
            if position != slot.data_offset as u64 {
                tracing::warn!(
                    texture = texture.name(),
                    face,
                    level,
                    "data offset mismatch, {:#x} != {:#x}",
                    position,
                    slot.data_offset
                );
                self.out.patch_with_position(slot.table_offset as u64)?;
                self.stats.offset_mismatches += 1;
            }

            if bytes.is_empty() {
                tracing::warn!(texture = texture.name(), face, level, "zero-length level");
                self.out.fill(0, DATA_ALIGN)?;
                self.stats.zero_length_levels += 1;
            } else {
                self.out.write_bytes(bytes)?;
                self.out.pad_to(DATA_ALIGN, LEVEL_PAD)?;
            }
        }

        Ok(())
    }

    fn write_ext_info(&mut self, layout: &Layout) -> Result<()> {
        let Some(ext) = &layout.ext_info else {
            return Ok(());
        };

        self.out.pad_to(DATA_ALIGN, SECTION_PAD)?;
        if self.out.position() != ext.offset as u64 {
            tracing::warn!(
                "ext info offset mismatch, {:#x} != {:#x}",
                self.out.position(),
                ext.offset
            );
            self.out.patch_with_position(ContainerHeader::EXT_INFO_OFFSET)?;
            self.stats.offset_mismatches += 1;
        }

        let ext_start = self.out.position();
        self.out.write_u32(EXT_INFO_HEADER_SIZE)?;
        let name_table_offset = self.out.position_u32()? + 4;
        self.out.write_u32(name_table_offset)?;

        let name_table = self.out.position();
        for name in &ext.names {
            self.out.write_u32(name.offset)?;
        }

        for (index, name) in ext.names.iter().enumerate() {
            if self.out.position() != name.offset as u64 {
                tracing::warn!(
                    name = %name.name,
                    "name offset mismatch, {:#x} != {:#x}",
                    self.out.position(),
                    name.offset
                );
                self.out.patch_with_position(name_table + index as u64 * 4)?;
                self.stats.offset_mismatches += 1;
            }
            self.out.write_bytes(name.name.as_bytes())?;
            self.out.write_u8(0)?;
        }

        tracing::debug!(offset = ext_start, names = ext.names.len(), "wrote ext info");
        Ok(())
    }

    fn finalize(&mut self, layout: &Layout) -> Result<()> {
        let end = self.out.position();
        if end != layout.total_size as u64 {
            tracing::warn!(
                "container size mismatch, {:#x} != {:#x}",
                end,
                layout.total_size
            );
            self.out.patch_with_position(ContainerHeader::TOTAL_SIZE_OFFSET)?;
            self.stats.offset_mismatches += 1;
        }
        self.stats.total_size = end;
        Ok(())
    }
}

fn check_layout(catalog: &Catalog, layout: &Layout) -> Result<()> {
    let names = layout.ext_info.as_ref().map_or(catalog.len(), |ext| ext.names.len());
    if layout.directory.len() == catalog.len()
        && layout.slots.len() == catalog.slot_count()
        && names == catalog.len()
    {
        return Ok(());
    }
    Err(Error::LayoutMismatch {
        planned_textures: layout.directory.len(),
        planned_slots: layout.slots.len(),
        textures: catalog.len(),
        slots: catalog.slot_count(),
    })
}

/// Plan and write a container to `out`.
pub fn write_container<W: Write + Seek>(
    out: W,
    catalog: &Catalog,
    options: &PackOptions,
) -> Result<(W, PackStats)> {
    let layout = Layout::plan(catalog, options)?;
    ContainerWriter::new(out)?.write(catalog, &layout)
}

/// Pack a catalog into memory.
pub fn pack_to_vec(catalog: &Catalog, options: &PackOptions) -> Result<Vec<u8>> {
    let (cursor, _) = write_container(Cursor::new(Vec::new()), catalog, options)?;
    Ok(cursor.into_inner())
}

/// Pack a catalog into a file.
///
/// The file is created or truncated. If writing fails partway the file is
/// left behind with undefined content.
pub fn pack_to_file<P: AsRef<Path>>(
    catalog: &Catalog,
    options: &PackOptions,
    path: P,
) -> Result<PackStats> {
    let file = File::create(path)?;
    let (_, stats) = write_container(BufWriter::new(file), catalog, options)?;
    Ok(stats)
}
