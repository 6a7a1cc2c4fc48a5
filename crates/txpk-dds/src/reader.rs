//! Source texture reading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use txpk_common::BinaryReader;

use crate::format::{MipChain, TextureFormat};
use crate::header::DdsHeader;
use crate::{Error, Result, DDS_MAGIC};

/// Options that apply to every source read in a packing run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Keep only the top mip level.
    pub no_mipmaps: bool,
}

/// A block-compressed texture read from a DDS file.
#[derive(Debug, Clone)]
pub struct SourceTexture {
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    /// Depth as declared by the source. Informational only.
    pub depth: u32,
    /// Declared byte size of the top level.
    pub top_level_size: u32,
    /// Raw level payloads, top level first.
    pub levels: Vec<Vec<u8>>,
}

impl SourceTexture {
    /// Number of mip levels read.
    #[inline]
    pub fn mip_count(&self) -> usize {
        self.levels.len()
    }

    /// Sum of all level sizes.
    pub fn data_size(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

/// Read a DDS texture from disk.
///
/// Returns `Ok(None)` when the file is a valid DDS whose compression format
/// is not one of the supported block formats; the caller should skip it.
///
/// # Errors
///
/// - [`Error::NotFound`] if `path` does not exist
/// - [`Error::InvalidMagic`] if the file is not a DDS
/// - [`Error::Common`] if the header or level data is truncated
pub fn read_texture<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Option<SourceTexture>> {
    let path = path.as_ref();

    let data = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    parse_texture(&data, options)
}

/// Parse a DDS texture from memory.
///
/// See [`read_texture`] for the meaning of `Ok(None)`.
pub fn parse_texture(data: &[u8], options: ReadOptions) -> Result<Option<SourceTexture>> {
    let mut reader = BinaryReader::new(data);

    let magic: [u8; 4] = reader.read_array()?;
    if &magic != DDS_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }

    let header_start = reader.position();
    let header: DdsHeader = reader.read_struct()?;

    let four_cc = header.pixel_format.four_cc;
    let Some(format) = TextureFormat::from_four_cc(four_cc) else {
        tracing::warn!(
            "unsupported data format {:#06x} ({:?})",
            four_cc.as_u32(),
            four_cc
        );
        return Ok(None);
    };

    // The declared header size may cover vendor extension fields.
    let header_size = header.size as usize;
    if header_size < DdsHeader::SIZE as usize {
        return Err(Error::InvalidHeader(format!(
            "declared header size {header_size} is smaller than {}",
            DdsHeader::SIZE
        )));
    }
    reader.seek(header_start + header_size);

    let count = if options.no_mipmaps {
        1
    } else {
        (header.mipmap_count as usize).max(1)
    };

    let width = header.width;
    let height = header.height;
    let top_level_size = header.pitch_or_linear_size;

    let computed_top = format.level_size(width, height);
    if computed_top != top_level_size as usize {
        tracing::debug!(
            declared = top_level_size,
            computed = computed_top,
            "top level size differs from block size formula, using declared size"
        );
    }

    // Every level is at least one block, which bounds the declared count.
    let mut levels = Vec::with_capacity(count.min(reader.remaining() / format.block_size() + 1));
    for (level, (w, h)) in MipChain::new(width, height).take(count).enumerate() {
        let size = if level == 0 {
            top_level_size as usize
        } else {
            format.level_size(w, h)
        };
        levels.push(reader.read_bytes(size)?.to_vec());
    }

    Ok(Some(SourceTexture {
        format,
        width,
        height,
        depth: header.depth,
        top_level_size,
        levels,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_dds;
    use crate::header::FourCC;
    use txpk_common::IntoBytes;

    fn levels_for(format: TextureFormat, width: u32, height: u32, count: usize) -> Vec<Vec<u8>> {
        let top = format.level_size(width, height);
        format
            .mip_sizes(width, height, top, count)
            .into_iter()
            .enumerate()
            .map(|(i, size)| vec![i as u8 + 1; size])
            .collect()
    }

    #[test]
    fn test_parse_full_chain() {
        let levels = levels_for(TextureFormat::Dxt5, 16, 16, 5);
        let bytes = encode_dds(TextureFormat::Dxt5, 16, 16, &levels);

        let texture = parse_texture(&bytes, ReadOptions::default()).unwrap().unwrap();
        assert_eq!(texture.format, TextureFormat::Dxt5);
        assert_eq!((texture.width, texture.height), (16, 16));
        assert_eq!(texture.top_level_size, 256);
        assert_eq!(texture.levels, levels);
        assert_eq!(texture.data_size(), 256 + 64 + 16 + 16 + 16);
    }

    #[test]
    fn test_no_mipmaps_keeps_top_level() {
        let levels = levels_for(TextureFormat::Dxt1, 32, 32, 6);
        let bytes = encode_dds(TextureFormat::Dxt1, 32, 32, &levels);

        let options = ReadOptions { no_mipmaps: true };
        let texture = parse_texture(&bytes, options).unwrap().unwrap();
        assert_eq!(texture.mip_count(), 1);
        assert_eq!(texture.levels[0], levels[0]);
    }

    #[test]
    fn test_zero_mip_count_reads_one_level() {
        let levels = levels_for(TextureFormat::Dxt1, 8, 8, 1);
        let mut bytes = encode_dds(TextureFormat::Dxt1, 8, 8, &levels);
        // mipmap_count sits at byte 24 of the header
        bytes[4 + 24..4 + 28].copy_from_slice(&0u32.to_le_bytes());

        let texture = parse_texture(&bytes, ReadOptions::default()).unwrap().unwrap();
        assert_eq!(texture.mip_count(), 1);
        assert_eq!(texture.levels[0].len(), 32);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode_dds(TextureFormat::Dxt1, 4, 4, &[vec![0; 8]]);
        bytes[..4].copy_from_slice(b"PNG ");
        assert!(matches!(
            parse_texture(&bytes, ReadOptions::default()),
            Err(Error::InvalidMagic(m)) if &m == b"PNG "
        ));
    }

    #[test]
    fn test_unsupported_format_is_skipped() {
        let header = {
            let mut h = DdsHeader::compressed(TextureFormat::Dxt1, 4, 4, 1, 16);
            h.pixel_format.four_cc = FourCC(*b"ATI2");
            h
        };
        let mut bytes = DDS_MAGIC.to_vec();
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&[0; 16]);

        assert!(parse_texture(&bytes, ReadOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_header_size_skips_extension_fields() {
        let levels = levels_for(TextureFormat::Dxt3, 4, 4, 1);
        let mut header = DdsHeader::compressed(TextureFormat::Dxt3, 4, 4, 1, 16);
        header.size = DdsHeader::SIZE + 8;

        let mut bytes = DDS_MAGIC.to_vec();
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&[0xEE; 8]);
        bytes.extend_from_slice(&levels[0]);

        let texture = parse_texture(&bytes, ReadOptions::default()).unwrap().unwrap();
        assert_eq!(texture.levels, levels);
    }

    #[test]
    fn test_truncated_levels_fail() {
        let levels = levels_for(TextureFormat::Dxt1, 16, 16, 3);
        let mut bytes = encode_dds(TextureFormat::Dxt1, 16, 16, &levels);
        bytes.truncate(bytes.len() - 4);

        assert!(matches!(
            parse_texture(&bytes, ReadOptions::default()),
            Err(Error::Common(txpk_common::Error::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn test_oversized_mip_count_fails_on_eof() {
        let levels = levels_for(TextureFormat::Dxt1, 4, 4, 1);
        let mut bytes = encode_dds(TextureFormat::Dxt1, 4, 4, &levels);
        bytes[4 + 24..4 + 28].copy_from_slice(&u32::MAX.to_le_bytes());

        assert!(matches!(
            parse_texture(&bytes, ReadOptions::default()),
            Err(Error::Common(txpk_common::Error::UnexpectedEof { .. }))
        ));
        // A single-level read ignores the declared count.
        let options = ReadOptions { no_mipmaps: true };
        let texture = parse_texture(&bytes, options).unwrap().unwrap();
        assert_eq!(texture.levels, levels);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.dds");
        assert!(matches!(
            read_texture(&path, ReadOptions::default()),
            Err(Error::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rock.dds");
        let levels = levels_for(TextureFormat::Dxt1, 64, 64, 1);
        std::fs::write(&path, encode_dds(TextureFormat::Dxt1, 64, 64, &levels)).unwrap();

        let texture = read_texture(&path, ReadOptions::default()).unwrap().unwrap();
        assert_eq!(texture.top_level_size, 2048);
        assert_eq!(texture.levels, levels);
    }
}
