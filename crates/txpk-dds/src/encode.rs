//! DDS encoding.

use zerocopy::IntoBytes;

use crate::format::TextureFormat;
use crate::header::DdsHeader;
use crate::DDS_MAGIC;

/// Encode level payloads as a standalone DDS file.
///
/// The mip count is `levels.len()` and the declared top level size is the
/// length of the first level. Payloads are written back to back, top level
/// first, with no validation against the block size formula.
pub fn encode_dds<L: AsRef<[u8]>>(
    format: TextureFormat,
    width: u32,
    height: u32,
    levels: &[L],
) -> Vec<u8> {
    let top_level_size = levels.first().map_or(0, |l| l.as_ref().len()) as u32;
    let header = DdsHeader::compressed(format, width, height, levels.len() as u32, top_level_size);

    let payload: usize = levels.iter().map(|l| l.as_ref().len()).sum();
    let mut output = Vec::with_capacity(DDS_MAGIC.len() + DdsHeader::SIZE as usize + payload);

    output.extend_from_slice(DDS_MAGIC);
    output.extend_from_slice(header.as_bytes());
    for level in levels {
        output.extend_from_slice(level.as_ref());
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_layout() {
        let levels = [vec![0xAB; 32], vec![0xCD; 8]];
        let bytes = encode_dds(TextureFormat::Dxt1, 8, 8, &levels);

        assert_eq!(&bytes[..4], b"DDS ");
        assert_eq!(bytes.len(), 4 + 124 + 40);
        // height, width, linear size, depth, mip count
        assert_eq!(&bytes[12..16], &8u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &8u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &32u32.to_le_bytes());
        assert_eq!(&bytes[28..32], &2u32.to_le_bytes());
        assert_eq!(&bytes[84..88], b"DXT1");
        assert!(bytes[128..160].iter().all(|&b| b == 0xAB));
    }
}
