//! Texture catalog built from a manifest.

use txpk_dds::{assemble_cubemap, read_texture, Error as DdsError};

use crate::manifest::{Manifest, ManifestEntry};
use crate::texture::{Texture, TextureKind};
use crate::{PackOptions, Result};

/// Builds a [`Catalog`] one manifest entry at a time.
///
/// Missing files and unsupported formats are logged and recorded as
/// placeholder entries so the directory keeps one entry per manifest line.
/// Anything else (a source that is not a DDS, a truncated file) is fatal.
#[derive(Debug)]
pub struct CatalogBuilder<'a> {
    options: &'a PackOptions,
    textures: Vec<Texture>,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(options: &'a PackOptions) -> Self {
        Self {
            options,
            textures: Vec::new(),
        }
    }

    /// Load one entry and append it.
    pub fn add(&mut self, entry: &ManifestEntry) -> Result<&Texture> {
        let read_options = self.options.read_options();

        let texture = match entry {
            ManifestEntry::Texture { path } => {
                let resolved = self.options.resolve(path);
                match read_texture(&resolved, read_options) {
                    Ok(Some(source)) => {
                        tracing::debug!(
                            path = %resolved.display(),
                            format = %source.format,
                            width = source.width,
                            height = source.height,
                            levels = source.mip_count(),
                            "loaded texture"
                        );
                        Texture::flat(entry.name(), source)
                    }
                    Ok(None) => {
                        tracing::warn!(path = %resolved.display(), "unsupported format, entry left empty");
                        Texture::placeholder(entry.name(), TextureKind::Flat)
                    }
                    Err(DdsError::NotFound(_)) => {
                        tracing::warn!(path = %resolved.display(), "file not found, entry left empty");
                        Texture::placeholder(entry.name(), TextureKind::Flat)
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            ManifestEntry::Cubemap { name, faces } => {
                let resolved: Vec<_> = faces.iter().map(|f| self.options.resolve(f)).collect();
                match assemble_cubemap(&resolved, read_options)? {
                    Some(cube) => {
                        tracing::debug!(
                            name = %name,
                            format = %cube.format,
                            width = cube.width,
                            height = cube.height,
                            levels = cube.mip_count,
                            "loaded cubemap"
                        );
                        Texture::cube(entry.name(), cube)
                    }
                    None => {
                        tracing::warn!(name = %name, "no readable cubemap face, entry left empty");
                        Texture::placeholder(entry.name(), TextureKind::Cube)
                    }
                }
            }
        };

        self.textures.push(texture);
        Ok(&self.textures[self.textures.len() - 1])
    }

    /// Finish building.
    pub fn finish(self) -> Catalog {
        Catalog {
            textures: self.textures,
        }
    }
}

/// Ordered, immutable list of textures to pack.
///
/// Order is manifest order and fixes directory and offset table order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    textures: Vec<Texture>,
}

impl Catalog {
    /// Load every entry of a manifest.
    pub fn from_manifest(manifest: &Manifest, options: &PackOptions) -> Result<Self> {
        let mut builder = CatalogBuilder::new(options);
        for entry in manifest.entries() {
            builder.add(entry)?;
        }
        Ok(builder.finish())
    }

    /// Wrap textures that were loaded elsewhere.
    pub fn from_textures(textures: Vec<Texture>) -> Self {
        Self { textures }
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Total number of offset table slots.
    pub fn slot_count(&self) -> usize {
        self.textures.iter().map(Texture::slot_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use txpk_dds::{encode_dds, TextureFormat};

    use super::*;

    fn write_dds(dir: &Path, name: &str, width: u32, levels: usize) {
        let format = TextureFormat::Dxt5;
        let top = format.level_size(width, width);
        let data: Vec<Vec<u8>> = format
            .mip_sizes(width, width, top, levels)
            .into_iter()
            .map(|size| vec![0x5A; size])
            .collect();
        fs::write(dir.join(name), encode_dds(format, width, width, &data)).unwrap();
    }

    fn options(dir: &Path) -> PackOptions {
        PackOptions {
            base_dir: Some(dir.to_path_buf()),
            ..PackOptions::default()
        }
    }

    #[test]
    fn test_catalog_keeps_manifest_order() {
        let dir = tempfile::tempdir().unwrap();
        write_dds(dir.path(), "a.dds", 16, 3);
        write_dds(dir.path(), "b.dds", 8, 1);

        let manifest = Manifest::parse("b.dds\na.dds");
        let catalog = Catalog::from_manifest(&manifest, &options(dir.path())).unwrap();

        let names: Vec<_> = catalog.textures().iter().map(Texture::name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(catalog.slot_count(), 1 + 3);
    }

    #[test]
    fn test_missing_file_becomes_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        write_dds(dir.path(), "a.dds", 16, 1);

        let manifest = Manifest::parse("nope.dds\na.dds");
        let catalog = Catalog::from_manifest(&manifest, &options(dir.path())).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.textures()[0].is_placeholder());
        assert_eq!(catalog.textures()[0].name(), "nope");
        assert!(!catalog.textures()[1].is_placeholder());
    }

    #[test]
    fn test_no_mipmaps_option() {
        let dir = tempfile::tempdir().unwrap();
        write_dds(dir.path(), "a.dds", 32, 6);

        let mut opts = options(dir.path());
        opts.no_mipmaps = true;
        let catalog = Catalog::from_manifest(&Manifest::parse("a.dds"), &opts).unwrap();
        assert_eq!(catalog.textures()[0].mip_count(), 1);
    }

    #[test]
    fn test_bad_magic_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.dds"), b"not a texture at all").unwrap();

        let result = Catalog::from_manifest(&Manifest::parse("bad.dds"), &options(dir.path()));
        assert!(matches!(
            result,
            Err(crate::Error::Dds(DdsError::InvalidMagic(_)))
        ));
    }

    #[test]
    fn test_unreadable_cubemap_becomes_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::parse("sky > 1.dds 2.dds 3.dds 4.dds 5.dds 6.dds");
        let catalog = Catalog::from_manifest(&manifest, &options(dir.path())).unwrap();

        let texture = &catalog.textures()[0];
        assert!(texture.is_placeholder());
        assert_eq!(texture.kind(), TextureKind::Cube);
        assert_eq!(texture.name(), "sky");
    }
}
