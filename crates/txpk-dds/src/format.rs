//! Block-compressed formats and mip level sizing.

use crate::header::FourCC;

/// The block-compressed formats a TPK container can carry.
///
/// The discriminant is the format byte written into the container directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum TextureFormat {
    /// BC1, 4 bits per texel.
    Dxt1 = 1,
    /// BC2, 8 bits per texel.
    Dxt3 = 2,
    /// BC3, 8 bits per texel.
    Dxt5 = 3,
}

impl TextureFormat {
    /// Map a DDS compression tag to a supported format.
    pub fn from_four_cc(four_cc: FourCC) -> Option<Self> {
        match four_cc {
            FourCC::DXT1 => Some(Self::Dxt1),
            FourCC::DXT3 => Some(Self::Dxt3),
            FourCC::DXT5 => Some(Self::Dxt5),
            _ => None,
        }
    }

    /// Map a container directory format byte back to a format.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Dxt1),
            2 => Some(Self::Dxt3),
            3 => Some(Self::Dxt5),
            _ => None,
        }
    }

    /// Directory format byte.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// DDS compression tag.
    pub fn four_cc(self) -> FourCC {
        match self {
            Self::Dxt1 => FourCC::DXT1,
            Self::Dxt3 => FourCC::DXT3,
            Self::Dxt5 => FourCC::DXT5,
        }
    }

    /// Bytes per 4x4 block.
    #[inline]
    pub fn block_size(self) -> usize {
        match self {
            Self::Dxt1 => 8,
            Self::Dxt3 | Self::Dxt5 => 16,
        }
    }

    /// Byte size of one mip level of `width` x `height` texels.
    ///
    /// Partial blocks round up, so anything below 4x4 still costs one block.
    #[inline]
    pub fn level_size(self, width: u32, height: u32) -> usize {
        let blocks_x = (width as usize).div_ceil(4).max(1);
        let blocks_y = (height as usize).div_ceil(4).max(1);
        blocks_x * blocks_y * self.block_size()
    }

    /// Byte sizes of a mip chain of `count` levels.
    ///
    /// Level 0 takes `top_level_size` as declared by the source rather than
    /// the computed value; deeper levels come from [`level_size`](Self::level_size).
    pub fn mip_sizes(self, width: u32, height: u32, top_level_size: usize, count: usize) -> Vec<usize> {
        MipChain::new(width, height)
            .take(count)
            .enumerate()
            .map(|(level, (w, h))| {
                if level == 0 {
                    top_level_size
                } else {
                    self.level_size(w, h)
                }
            })
            .collect()
    }
}

impl std::fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Dxt1 => "DXT1",
            Self::Dxt3 => "DXT3",
            Self::Dxt5 => "DXT5",
        })
    }
}

/// Dimensions of the next mip level down. Never reaches zero.
#[inline]
pub fn next_mip_dims(width: u32, height: u32) -> (u32, u32) {
    ((width >> 1).max(1), (height >> 1).max(1))
}

/// Endless iterator over mip level dimensions, starting at the top level.
#[derive(Debug, Clone)]
pub struct MipChain {
    width: u32,
    height: u32,
}

impl MipChain {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

impl Iterator for MipChain {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let current = (self.width, self.height);
        (self.width, self.height) = next_mip_dims(self.width, self.height);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_size() {
        // 4x4 block minimum
        assert_eq!(TextureFormat::Dxt1.level_size(1, 1), 8);
        assert_eq!(TextureFormat::Dxt5.level_size(1, 1), 16);
        assert_eq!(TextureFormat::Dxt1.level_size(64, 64), 2048);
        assert_eq!(TextureFormat::Dxt3.level_size(64, 64), 4096);
        assert_eq!(TextureFormat::Dxt5.level_size(1024, 1024), 1024 * 1024);
        assert_eq!(TextureFormat::Dxt1.level_size(5, 3), 2 * 8);
    }

    #[test]
    fn test_codes_roundtrip() {
        for format in [TextureFormat::Dxt1, TextureFormat::Dxt3, TextureFormat::Dxt5] {
            assert_eq!(TextureFormat::from_code(format.code()), Some(format));
            assert_eq!(TextureFormat::from_four_cc(format.four_cc()), Some(format));
        }
        assert_eq!(TextureFormat::from_code(0), None);
        assert_eq!(TextureFormat::from_four_cc(FourCC(*b"ATI2")), None);
    }

    #[test]
    fn test_mip_sizes_trust_top_level() {
        let sizes = TextureFormat::Dxt1.mip_sizes(16, 8, 100, 4);
        // 8x4 -> 2 blocks, 4x2 -> 1 block, 2x1 -> 1 block
        assert_eq!(sizes, vec![100, 16, 8, 8]);
    }

    #[test]
    fn test_mip_chain_non_square() {
        let dims: Vec<_> = MipChain::new(8, 2).take(5).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1), (1, 1)]);
    }

    fn any_format() -> impl Strategy<Value = TextureFormat> {
        prop_oneof![
            Just(TextureFormat::Dxt1),
            Just(TextureFormat::Dxt3),
            Just(TextureFormat::Dxt5),
        ]
    }

    proptest! {
        #[test]
        fn test_level_size_rounding_invariance(
            format in any_format(),
            w in 1u32..=8192,
            h in 1u32..=8192,
        ) {
            let aligned_w = (w + 3) & !3;
            let aligned_h = (h + 3) & !3;
            prop_assert_eq!(format.level_size(w, h), format.level_size(aligned_w, aligned_h));
        }

        #[test]
        fn test_mip_chain_reaches_one_by_one(w in 1u32..=16384, h in 1u32..=16384) {
            // A full chain has floor(log2(max(w, h))) + 1 levels.
            let levels = 32 - w.max(h).leading_zeros() as usize;
            let dims: Vec<_> = MipChain::new(w, h).take(levels).collect();

            prop_assert!(dims.iter().all(|&(dw, dh)| dw >= 1 && dh >= 1));
            prop_assert_eq!(dims.last().copied(), Some((1, 1)));
        }
    }
}
