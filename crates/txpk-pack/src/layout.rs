//! Container layout planning.
//!
//! [`Layout::plan`] computes every offset of a container from the catalog
//! alone, before a single byte is written. The writer then emits the file
//! front to back and only seeks backwards if the stream drifts from the plan.

use txpk_common::align_up;

use crate::catalog::Catalog;
use crate::header::{
    ContainerHeader, DirectoryEntry, DATA_ALIGN, EXT_INFO_HEADER_SIZE,
};
use crate::texture::Texture;
use crate::{Error, PackOptions, Result};

/// Planned position of one (texture, face, level) payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlan {
    pub texture: usize,
    pub face: usize,
    pub level: usize,
    /// Position of this slot's entry in the offset table.
    pub table_offset: u32,
    /// Position of the payload.
    pub data_offset: u32,
    /// Payload length before padding.
    pub len: usize,
}

impl SlotPlan {
    /// Bytes the slot occupies in the data block.
    ///
    /// Empty payloads still take one 16-byte span.
    #[inline]
    pub fn span(&self) -> u64 {
        slot_span(self.len)
    }
}

/// Planned name string in the extended info block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePlan {
    pub offset: u32,
    pub name: String,
}

/// Planned extended info block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtInfoPlan {
    pub offset: u32,
    pub name_table_offset: u32,
    pub names: Vec<NamePlan>,
}

/// Every offset of a container, derived from a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub header: ContainerHeader,
    pub directory: Vec<DirectoryEntry>,
    pub offset_table_start: u32,
    pub offset_table_end: u32,
    /// First data block, 16-aligned.
    pub data_start: u32,
    pub data_end: u32,
    /// Slots in offset table order.
    pub slots: Vec<SlotPlan>,
    pub ext_info: Option<ExtInfoPlan>,
    pub total_size: u32,
}

impl Layout {
    /// Plan the container for `catalog`.
    pub fn plan(catalog: &Catalog, options: &PackOptions) -> Result<Self> {
        let textures = catalog.textures();

        let offset_table_start =
            (ContainerHeader::SIZE + textures.len() * DirectoryEntry::SIZE) as u64;

        // Directory: table offsets follow from slot counts alone.
        let mut directory = Vec::with_capacity(textures.len());
        let mut table_cursor = offset_table_start;
        for texture in textures {
            directory.push(directory_entry(texture, to_u32(table_cursor)?)?);
            table_cursor += texture.slot_count() as u64 * 4;
        }
        let offset_table_end = table_cursor;

        // Offset table and data blocks.
        let data_start = align_up(offset_table_end, DATA_ALIGN);
        let mut data_cursor = data_start;
        let mut table_cursor = offset_table_start;
        let mut slots = Vec::with_capacity(catalog.slot_count());
        for (index, texture) in textures.iter().enumerate() {
            for (face, level, bytes) in texture.slots() {
                slots.push(SlotPlan {
                    texture: index,
                    face,
                    level,
                    table_offset: to_u32(table_cursor)?,
                    data_offset: to_u32(data_cursor)?,
                    len: bytes.len(),
                });
                table_cursor += 4;
                data_cursor += slot_span(bytes.len());
            }
        }
        let data_end = data_cursor;

        let mut end = data_end;
        let ext_info = if options.ext_info {
            let offset = align_up(end, DATA_ALIGN);
            let name_table_offset = offset + EXT_INFO_HEADER_SIZE as u64;
            let mut name_cursor = name_table_offset + textures.len() as u64 * 4;

            let mut names = Vec::with_capacity(textures.len());
            for texture in textures {
                let name = format!("{}{}", options.name_prefix, texture.name());
                let len = name.len() as u64 + 1;
                names.push(NamePlan {
                    offset: to_u32(name_cursor)?,
                    name,
                });
                name_cursor += len;
            }
            end = name_cursor;

            Some(ExtInfoPlan {
                offset: to_u32(offset)?,
                name_table_offset: to_u32(name_table_offset)?,
                names,
            })
        } else {
            None
        };

        let total_size = to_u32(end)?;
        let header = ContainerHeader {
            magic: *ContainerHeader::MAGIC,
            texture_count: textures.len() as u32,
            total_size,
            ext_info_offset: ext_info.as_ref().map_or(0, |ext| ext.offset),
        };

        Ok(Self {
            header,
            directory,
            offset_table_start: to_u32(offset_table_start)?,
            offset_table_end: to_u32(offset_table_end)?,
            data_start: to_u32(data_start)?,
            data_end: to_u32(data_end)?,
            slots,
            ext_info,
            total_size,
        })
    }
}

fn slot_span(len: usize) -> u64 {
    if len == 0 {
        DATA_ALIGN
    } else {
        align_up(len as u64, DATA_ALIGN)
    }
}

fn to_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::ContainerTooLarge(value))
}

fn directory_entry(texture: &Texture, offset_table_offset: u32) -> Result<DirectoryEntry> {
    let kind = texture.kind();

    let Some(image) = texture.image() else {
        return Ok(DirectoryEntry {
            format: 0,
            mip_count: 0,
            width: 0,
            height: 0,
            depth: kind.depth_marker(),
            top_level_size: 0,
            offset_table_offset,
        });
    };

    let (width, height) = match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(Error::DimensionOverflow {
                name: texture.name().to_string(),
                width: image.width(),
                height: image.height(),
            })
        }
    };
    let mip_count = u8::try_from(image.mip_count()).map_err(|_| Error::TooManyLevels {
        name: texture.name().to_string(),
        count: image.mip_count(),
    })?;

    Ok(DirectoryEntry {
        format: image.format().code(),
        mip_count,
        width,
        height,
        depth: kind.depth_marker(),
        top_level_size: image.top_level_size(),
        offset_table_offset,
    })
}
