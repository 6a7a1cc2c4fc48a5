//! Cubemap assembly from six face files.

use std::path::Path;

use crate::format::TextureFormat;
use crate::reader::{read_texture, ReadOptions, SourceTexture};
use crate::{Error, Result};

/// Number of faces in a cubemap.
pub const CUBE_FACES: usize = 6;

/// Six faces read from separate DDS files.
///
/// Format, dimensions and mip count are fixed by the first face that could
/// be read. Faces that are missing or unsupported hold `mip_count` empty
/// levels so every face has the same shape.
#[derive(Debug, Clone)]
pub struct SourceCubemap {
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub top_level_size: u32,
    pub mip_count: usize,
    /// `faces[face][level]`, in canonical face order.
    pub faces: Vec<Vec<Vec<u8>>>,
}

impl SourceCubemap {
    /// Sum of all face level sizes.
    pub fn data_size(&self) -> usize {
        self.faces.iter().flatten().map(Vec::len).sum()
    }
}

/// Read six face files into one cubemap.
///
/// Empty path strings are skipped before faces are counted, so the remaining
/// paths map to faces in order. Missing faces and faces in an unsupported
/// format are logged and left empty. Returns `Ok(None)` if no face at all
/// could be read.
///
/// Faces are not cross-checked beyond a warning: a face whose format or size
/// differs from the first is still used, truncated or padded to the first
/// face's mip count.
///
/// # Errors
///
/// A face that is not a DDS file fails the whole cubemap with
/// [`Error::InvalidMagic`].
pub fn assemble_cubemap<P: AsRef<Path>>(
    face_paths: &[P],
    options: ReadOptions,
) -> Result<Option<SourceCubemap>> {
    let paths: Vec<&Path> = face_paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.as_os_str().is_empty())
        .collect();

    if paths.len() > CUBE_FACES {
        tracing::warn!(
            count = paths.len(),
            "cubemap lists more than {CUBE_FACES} faces, ignoring extras"
        );
    } else if paths.len() < CUBE_FACES {
        tracing::warn!(
            count = paths.len(),
            "cubemap lists fewer than {CUBE_FACES} faces, missing faces stay empty"
        );
    }

    let mut faces: Vec<Option<SourceTexture>> = Vec::with_capacity(CUBE_FACES);
    for face in 0..CUBE_FACES {
        let source = match paths.get(face) {
            Some(path) => read_face(path, options)?,
            None => None,
        };
        faces.push(source);
    }

    let Some(first) = faces.iter().flatten().next() else {
        return Ok(None);
    };

    let format = first.format;
    let width = first.width;
    let height = first.height;
    let top_level_size = first.top_level_size;
    let mip_count = first.mip_count();

    let faces = faces
        .into_iter()
        .enumerate()
        .map(|(index, face)| match face {
            Some(face) => {
                if face.format != format || face.width != width || face.height != height {
                    tracing::warn!(
                        face = index,
                        "cubemap face is {} {}x{}, expected {} {}x{}",
                        face.format,
                        face.width,
                        face.height,
                        format,
                        width,
                        height
                    );
                }
                let mut levels = face.levels;
                if levels.len() != mip_count {
                    tracing::warn!(
                        face = index,
                        levels = levels.len(),
                        expected = mip_count,
                        "cubemap face mip count differs"
                    );
                    levels.resize_with(mip_count, Vec::new);
                }
                levels
            }
            None => vec![Vec::new(); mip_count],
        })
        .collect();

    Ok(Some(SourceCubemap {
        format,
        width,
        height,
        top_level_size,
        mip_count,
        faces,
    }))
}

fn read_face(path: &Path, options: ReadOptions) -> Result<Option<SourceTexture>> {
    match read_texture(path, options) {
        Ok(Some(face)) => Ok(Some(face)),
        Ok(None) => {
            tracing::warn!(path = %path.display(), "cubemap face skipped");
            Ok(None)
        }
        Err(Error::NotFound(missing)) => {
            tracing::warn!(path = %missing.display(), "cubemap face not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::encode::encode_dds;

    fn write_face(dir: &Path, name: &str, fill: u8, width: u32, levels: usize) -> PathBuf {
        let format = TextureFormat::Dxt1;
        let top = format.level_size(width, width);
        let data: Vec<Vec<u8>> = format
            .mip_sizes(width, width, top, levels)
            .into_iter()
            .map(|size| vec![fill; size])
            .collect();
        let path = dir.join(name);
        std::fs::write(&path, encode_dds(format, width, width, &data)).unwrap();
        path
    }

    #[test]
    fn test_assemble_six_faces() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..6)
            .map(|i| write_face(dir.path(), &format!("f{i}.dds"), i as u8, 8, 3))
            .collect();

        let cube = assemble_cubemap(&paths, ReadOptions::default()).unwrap().unwrap();
        assert_eq!(cube.mip_count, 3);
        assert_eq!(cube.faces.len(), CUBE_FACES);
        for (i, face) in cube.faces.iter().enumerate() {
            assert_eq!(face.len(), 3);
            assert_eq!(face[0].len(), 32);
            assert!(face.iter().flatten().all(|&b| b == i as u8));
        }
        assert_eq!(cube.data_size(), 6 * (32 + 8 + 8));
    }

    #[test]
    fn test_empty_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = vec![String::new()];
        for i in 0..6 {
            let path = write_face(dir.path(), &format!("f{i}.dds"), i as u8, 4, 1);
            paths.push(path.to_string_lossy().into_owned());
        }

        let cube = assemble_cubemap(&paths, ReadOptions::default()).unwrap().unwrap();
        assert!(cube.faces.iter().all(|f| f.len() == 1 && !f[0].is_empty()));
        assert_eq!(cube.faces[5][0][0], 5);
    }

    #[test]
    fn test_first_readable_face_fixes_shape() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            dir.path().join("missing.dds"),
            write_face(dir.path(), "a.dds", 1, 16, 2),
            write_face(dir.path(), "b.dds", 2, 16, 4),
        ];

        let cube = assemble_cubemap(&paths, ReadOptions::default()).unwrap().unwrap();
        assert_eq!((cube.width, cube.height, cube.mip_count), (16, 16, 2));
        // Missing first face and absent trailing faces are empty.
        assert!(cube.faces[0].iter().all(Vec::is_empty));
        assert_eq!(cube.faces[0].len(), 2);
        assert!(cube.faces[3..].iter().all(|f| f.len() == 2 && f.iter().all(Vec::is_empty)));
        // Longer chain is truncated to the first face's mip count.
        assert_eq!(cube.faces[2].len(), 2);
    }

    #[test]
    fn test_no_readable_face() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![dir.path().join("a.dds"), dir.path().join("b.dds")];
        assert!(assemble_cubemap(&paths, ReadOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_bad_face_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.dds");
        std::fs::write(&bad, b"JUNKJUNKJUNK").unwrap();
        let paths = vec![write_face(dir.path(), "a.dds", 1, 4, 1), bad];

        assert!(matches!(
            assemble_cubemap(&paths, ReadOptions::default()),
            Err(Error::InvalidMagic(_))
        ));
    }
}
