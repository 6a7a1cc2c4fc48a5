//! Texture list manifests.
//!
//! One entry per line. A plain line is a path to a DDS file. A line
//! containing `>` is a cubemap: the first token names the cubemap and the
//! remaining tokens are its face files, in face order. Tokens are split on
//! both ' ' and '>' and empty tokens are dropped, so
//!
//! ```text
//! textures/rock.dds
//! sky > sky_px.dds sky_nx.dds sky_py.dds sky_ny.dds sky_pz.dds sky_nz.dds
//! ```
//!
//! lists one ordinary texture and one cubemap named `sky`.

use std::fs;
use std::path::Path;

use crate::Result;

/// One line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// An ordinary texture.
    Texture { path: String },
    /// A cubemap assembled from face files.
    Cubemap { name: String, faces: Vec<String> },
}

impl ManifestEntry {
    /// Parse one line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        if line.contains('>') {
            let mut tokens = line.split([' ', '>']);
            let name = tokens.next().unwrap_or_default().to_string();
            let faces = tokens
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            Some(Self::Cubemap { name, faces })
        } else {
            Some(Self::Texture {
                path: line.to_string(),
            })
        }
    }

    /// Name recorded in the extended info block, before any prefix.
    ///
    /// A trailing `.dds` is dropped from both texture paths and cubemap names.
    pub fn name(&self) -> &str {
        let raw = match self {
            Self::Texture { path } => path,
            Self::Cubemap { name, .. } => name,
        };
        raw.strip_suffix(".dds").unwrap_or(raw)
    }

    /// Whether this entry describes a cubemap.
    pub fn is_cubemap(&self) -> bool {
        matches!(self, Self::Cubemap { .. })
    }
}

/// An ordered list of textures to pack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> Self {
        Self {
            entries: text.lines().filter_map(ManifestEntry::parse).collect(),
        }
    }

    /// Read and parse a manifest file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Entries in manifest order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the manifest lists nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_entry() {
        assert_eq!(
            ManifestEntry::parse("tex/rock.dds"),
            Some(ManifestEntry::Texture {
                path: "tex/rock.dds".into()
            })
        );
    }

    #[test]
    fn test_cubemap_entry() {
        let entry = ManifestEntry::parse("cube > a.dds b.dds c.dds d.dds e.dds f.dds").unwrap();
        assert_eq!(
            entry,
            ManifestEntry::Cubemap {
                name: "cube".into(),
                faces: ["a", "b", "c", "d", "e", "f"]
                    .iter()
                    .map(|f| format!("{f}.dds"))
                    .collect(),
            }
        );
        assert_eq!(entry.name(), "cube");
    }

    #[test]
    fn test_cubemap_without_spaces() {
        let entry = ManifestEntry::parse("env>px.dds>nx.dds  py.dds").unwrap();
        assert_eq!(
            entry,
            ManifestEntry::Cubemap {
                name: "env".into(),
                faces: vec!["px.dds".into(), "nx.dds".into(), "py.dds".into()],
            }
        );
    }

    #[test]
    fn test_name_strips_extension() {
        let entry = ManifestEntry::parse("tex/rock.dds").unwrap();
        assert_eq!(entry.name(), "tex/rock");
        let entry = ManifestEntry::parse("tex/rock.bin").unwrap();
        assert_eq!(entry.name(), "tex/rock.bin");
    }

    #[test]
    fn test_cubemap_name_strips_extension() {
        let entry = ManifestEntry::parse("sky.dds > a.dds b.dds c.dds d.dds e.dds f.dds").unwrap();
        assert!(entry.is_cubemap());
        assert_eq!(entry.name(), "sky");
    }

    #[test]
    fn test_manifest_skips_blank_lines() {
        let manifest = Manifest::parse("a.dds\r\n\r\n  \nsky > 1 2 3 4 5 6\nb.dds");
        assert_eq!(manifest.len(), 3);
        assert!(!manifest.entries()[0].is_cubemap());
        assert!(manifest.entries()[1].is_cubemap());
        assert_eq!(manifest.entries()[2].name(), "b");
    }
}
