//! Packable textures.

use txpk_dds::{SourceCubemap, SourceTexture, TextureFormat, CUBE_FACES};

use crate::header::DirectoryEntry;

/// Whether a texture is a single surface or a six-face cubemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TextureKind {
    Flat,
    Cube,
}

impl TextureKind {
    /// Number of faces stored for this kind.
    #[inline]
    pub fn face_count(self) -> usize {
        match self {
            Self::Flat => 1,
            Self::Cube => CUBE_FACES,
        }
    }

    /// Value of the directory depth field.
    #[inline]
    pub fn depth_marker(self) -> i16 {
        match self {
            Self::Flat => 0,
            Self::Cube => DirectoryEntry::CUBE_DEPTH,
        }
    }

    /// Decode the directory depth field.
    #[inline]
    pub fn from_depth_marker(depth: i16) -> Self {
        if depth == DirectoryEntry::CUBE_DEPTH {
            Self::Cube
        } else {
            Self::Flat
        }
    }
}

/// Pixel data of a texture that was read successfully.
#[derive(Debug, Clone)]
pub struct TextureImage {
    format: TextureFormat,
    width: u32,
    height: u32,
    depth: u32,
    top_level_size: u32,
    mip_count: usize,
    /// `faces[face][level]`
    faces: Vec<Vec<Vec<u8>>>,
    total_size: usize,
}

impl TextureImage {
    fn new(
        format: TextureFormat,
        width: u32,
        height: u32,
        depth: u32,
        top_level_size: u32,
        faces: Vec<Vec<Vec<u8>>>,
    ) -> Self {
        let mip_count = faces.first().map_or(0, Vec::len);
        let total_size = faces.iter().flatten().map(Vec::len).sum();
        Self {
            format,
            width,
            height,
            depth,
            top_level_size,
            mip_count,
            faces,
            total_size,
        }
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth as declared by the source file.
    pub fn source_depth(&self) -> u32 {
        self.depth
    }

    /// Declared byte size of the top level.
    pub fn top_level_size(&self) -> u32 {
        self.top_level_size
    }

    /// Levels per face.
    pub fn mip_count(&self) -> usize {
        self.mip_count
    }

    /// Sum of all level payload sizes.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Level payload of one face.
    pub fn level(&self, face: usize, level: usize) -> Option<&[u8]> {
        self.faces.get(face)?.get(level).map(Vec::as_slice)
    }
}

/// One directory entry's worth of texture.
///
/// A texture without an image is a placeholder for a manifest entry that
/// could not be read: it keeps its directory slot but owns no levels.
#[derive(Debug, Clone)]
pub struct Texture {
    name: String,
    kind: TextureKind,
    image: Option<TextureImage>,
}

impl Texture {
    /// An ordinary texture.
    pub fn flat(name: impl Into<String>, source: SourceTexture) -> Self {
        Self {
            name: name.into(),
            kind: TextureKind::Flat,
            image: Some(TextureImage::new(
                source.format,
                source.width,
                source.height,
                source.depth,
                source.top_level_size,
                vec![source.levels],
            )),
        }
    }

    /// A cubemap.
    pub fn cube(name: impl Into<String>, source: SourceCubemap) -> Self {
        Self {
            name: name.into(),
            kind: TextureKind::Cube,
            image: Some(TextureImage::new(
                source.format,
                source.width,
                source.height,
                0,
                source.top_level_size,
                source.faces,
            )),
        }
    }

    /// An entry with no data.
    pub fn placeholder(name: impl Into<String>, kind: TextureKind) -> Self {
        Self {
            name: name.into(),
            kind,
            image: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn image(&self) -> Option<&TextureImage> {
        self.image.as_ref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.image.is_none()
    }

    /// Levels per face, 0 for a placeholder.
    pub fn mip_count(&self) -> usize {
        self.image.as_ref().map_or(0, TextureImage::mip_count)
    }

    /// Number of offset table slots this texture occupies.
    pub fn slot_count(&self) -> usize {
        self.mip_count() * self.kind.face_count()
    }

    /// Sum of all level payload sizes.
    pub fn total_data_size(&self) -> usize {
        self.image.as_ref().map_or(0, TextureImage::total_size)
    }

    /// Level payloads in container order: face-outer, level-inner.
    ///
    /// Yields `(face, level, bytes)` for every slot. A face with no data for
    /// a level yields an empty slice.
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize, &[u8])> + '_ {
        let mip_count = self.mip_count();
        let faces = if self.image.is_some() {
            self.kind.face_count()
        } else {
            0
        };
        (0..faces).flat_map(move |face| {
            (0..mip_count).map(move |level| {
                let bytes = self
                    .image
                    .as_ref()
                    .and_then(|image| image.level(face, level))
                    .unwrap_or(&[]);
                (face, level, bytes)
            })
        })
    }
}
