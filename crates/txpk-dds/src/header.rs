//! DDS header structures.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::format::TextureFormat;

/// DDS file header, following the 4-byte `DDS ` signature.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124). Level data starts this many bytes
    /// after the start of the header.
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Byte size of the top mip level for compressed formats.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    pub const FLAG_CAPS: u32 = 0x1;
    pub const FLAG_HEIGHT: u32 = 0x2;
    pub const FLAG_WIDTH: u32 = 0x4;
    pub const FLAG_PIXELFORMAT: u32 = 0x1000;
    pub const FLAG_MIPMAPCOUNT: u32 = 0x2_0000;
    pub const FLAG_LINEARSIZE: u32 = 0x8_0000;

    pub const CAPS_COMPLEX: u32 = 0x8;
    pub const CAPS_TEXTURE: u32 = 0x1000;
    pub const CAPS_MIPMAP: u32 = 0x40_0000;

    /// Build a header describing a compressed 2D texture.
    pub fn compressed(
        format: TextureFormat,
        width: u32,
        height: u32,
        mip_count: u32,
        top_level_size: u32,
    ) -> Self {
        let mut flags = Self::FLAG_CAPS
            | Self::FLAG_HEIGHT
            | Self::FLAG_WIDTH
            | Self::FLAG_PIXELFORMAT
            | Self::FLAG_LINEARSIZE;
        let mut caps = Self::CAPS_TEXTURE;
        if mip_count > 1 {
            flags |= Self::FLAG_MIPMAPCOUNT;
            caps |= Self::CAPS_COMPLEX | Self::CAPS_MIPMAP;
        }

        Self {
            size: Self::SIZE,
            flags,
            height,
            width,
            pitch_or_linear_size: top_level_size,
            depth: 0,
            mipmap_count: mip_count,
            reserved1: [0; 11],
            pixel_format: DdsPixelFormat {
                size: DdsPixelFormat::SIZE,
                flags: DdsPixelFormat::FLAG_FOURCC,
                four_cc: format.four_cc(),
                rgb_bit_count: 0,
                r_bit_mask: 0,
                g_bit_mask: 0,
                b_bit_mask: 0,
                a_bit_mask: 0,
            },
            caps,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;
    /// `four_cc` holds a valid compression code.
    pub const FLAG_FOURCC: u32 = 0x4;
}

/// Four-character code for compression type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");

    /// The code as a little-endian integer, the way DDS tooling prints it.
    pub fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl std::fmt::Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            write!(f, "FourCC({:?})", String::from_utf8_lossy(&self.0))
        } else {
            write!(f, "FourCC({:#010x})", self.as_u32())
        }
    }
}
