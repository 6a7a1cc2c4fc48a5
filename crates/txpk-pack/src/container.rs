//! TPK container parsing.
//!
//! The reading side of [`ContainerWriter`](crate::ContainerWriter), used for
//! inspection and extraction. Level lengths are not stored in the container;
//! they are derived from the directory entry the same way a runtime loader
//! would: the top level uses the declared size, deeper levels the block size
//! formula.

use txpk_common::BinaryReader;
use txpk_dds::TextureFormat;

use crate::header::{ContainerHeader, DirectoryEntry};
use crate::texture::TextureKind;
use crate::{Error, Result};

/// One directory entry of a parsed container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PackedTexture {
    pub index: usize,
    /// Name from the extended info block, if present.
    pub name: Option<String>,
    /// `None` for an empty entry or an unknown format code.
    pub format: Option<TextureFormat>,
    pub format_code: u8,
    pub kind: TextureKind,
    pub mip_count: usize,
    pub width: u16,
    pub height: u16,
    pub top_level_size: u32,
    pub offset_table_offset: u32,
    /// Data offsets in slot order: face-outer, level-inner.
    pub level_offsets: Vec<u32>,
}

impl PackedTexture {
    pub fn face_count(&self) -> usize {
        self.kind.face_count()
    }

    /// Byte length of each level of one face.
    pub fn level_sizes(&self) -> Vec<usize> {
        match self.format {
            Some(format) => format.mip_sizes(
                self.width as u32,
                self.height as u32,
                self.top_level_size as usize,
                self.mip_count,
            ),
            None => vec![0; self.mip_count],
        }
    }

    /// Data offset of one (face, level) slot.
    pub fn level_offset(&self, face: usize, level: usize) -> Option<u32> {
        if face >= self.face_count() || level >= self.mip_count {
            return None;
        }
        self.level_offsets.get(face * self.mip_count + level).copied()
    }
}

/// Top-level facts about a container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContainerSummary {
    pub texture_count: u32,
    pub total_size: u32,
    pub ext_info_offset: u32,
    pub textures: Vec<PackedTexture>,
}

/// A TPK container parsed from memory.
#[derive(Debug, Clone)]
pub struct PackedContainer<'a> {
    data: &'a [u8],
    header: ContainerHeader,
    textures: Vec<PackedTexture>,
}

impl<'a> PackedContainer<'a> {
    /// Parse a container.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let magic: [u8; 4] = reader.read_array()?;
        if &magic != ContainerHeader::MAGIC {
            return Err(Error::InvalidMagic(magic));
        }
        reader.seek(0);
        let header: ContainerHeader = reader.read_struct()?;

        let count = header.texture_count as usize;
        let mut entries: Vec<DirectoryEntry> =
            Vec::with_capacity(count.min(reader.remaining() / DirectoryEntry::SIZE));
        for _ in 0..count {
            entries.push(reader.read_struct()?);
        }

        let ext_info_offset = header.ext_info_offset;
        let names = match ext_info_offset {
            0 => None,
            offset => Some(Self::parse_names(data, offset, count)?),
        };

        let mut textures = Vec::with_capacity(count);
        for (index, entry) in entries.into_iter().enumerate() {
            let kind = TextureKind::from_depth_marker(entry.depth);
            let mip_count = entry.mip_count as usize;
            let slot_count = mip_count * kind.face_count();

            let mut table = BinaryReader::new_at(data, entry.offset_table_offset as usize);
            let level_offsets = (0..slot_count)
                .map(|_| table.read_u32())
                .collect::<txpk_common::Result<Vec<_>>>()?;

            textures.push(PackedTexture {
                index,
                name: names.as_ref().and_then(|n| n.get(index).cloned()),
                format: TextureFormat::from_code(entry.format),
                format_code: entry.format,
                kind,
                mip_count,
                width: entry.width,
                height: entry.height,
                top_level_size: entry.top_level_size,
                offset_table_offset: entry.offset_table_offset,
                level_offsets,
            });
        }

        Ok(Self {
            data,
            header,
            textures,
        })
    }

    fn parse_names(data: &[u8], ext_offset: u32, count: usize) -> Result<Vec<String>> {
        let mut reader = BinaryReader::new_at(data, ext_offset as usize);
        let _header_size = reader.read_u32()?;
        let name_table = reader.read_u32()?;

        reader.seek(name_table as usize);
        let mut names = Vec::with_capacity(count.min(reader.remaining() / 4));
        for _ in 0..count {
            let offset = reader.read_u32()?;
            let mut name_reader = BinaryReader::new_at(data, offset as usize);
            names.push(name_reader.read_cstring()?.to_string());
        }
        Ok(names)
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn textures(&self) -> &[PackedTexture] {
        &self.textures
    }

    /// Find a texture by its extended info name.
    pub fn find(&self, name: &str) -> Option<&PackedTexture> {
        self.textures.iter().find(|t| t.name.as_deref() == Some(name))
    }

    /// Payload of one (face, level) slot.
    pub fn level_data(&self, texture: &PackedTexture, face: usize, level: usize) -> Result<&'a [u8]> {
        let sizes = texture.level_sizes();
        let len = sizes.get(level).copied().unwrap_or(0);
        let offset = texture
            .level_offset(face, level)
            .ok_or(Error::SlotOutOfRange { face, level })?;

        let start = offset as usize;
        self.data
            .get(start..start + len)
            .ok_or(Error::OffsetOutOfBounds {
                offset,
                len,
                size: self.data.len(),
            })
    }

    /// All level payloads of one face, top level first.
    pub fn face_levels(&self, texture: &PackedTexture, face: usize) -> Result<Vec<&'a [u8]>> {
        (0..texture.mip_count)
            .map(|level| self.level_data(texture, face, level))
            .collect()
    }

    /// Header facts and directory, for reporting.
    pub fn summary(&self) -> ContainerSummary {
        ContainerSummary {
            texture_count: self.header.texture_count,
            total_size: self.header.total_size,
            ext_info_offset: self.header.ext_info_offset,
            textures: self.textures.clone(),
        }
    }
}
