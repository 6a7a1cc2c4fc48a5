//! Packing options.

use std::path::{Path, PathBuf};

use txpk_dds::ReadOptions;

/// Options for one packing run.
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Keep only the top mip level of every texture.
    pub no_mipmaps: bool,
    /// Prepended to every name in the extended info block.
    pub name_prefix: String,
    /// Emit the extended info block.
    pub ext_info: bool,
    /// Directory that relative manifest paths resolve against.
    /// `None` resolves against the working directory.
    pub base_dir: Option<PathBuf>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            no_mipmaps: false,
            name_prefix: String::new(),
            ext_info: true,
            base_dir: None,
        }
    }
}

impl PackOptions {
    /// Options forwarded to the source reader.
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            no_mipmaps: self.no_mipmaps,
        }
    }

    /// Resolve a manifest path token.
    pub fn resolve(&self, path: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(path),
            None => Path::new(path).to_path_buf(),
        }
    }
}
