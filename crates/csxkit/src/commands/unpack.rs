//! `unpack`: extract an archive into kind folders.
//!
//! The output mirrors the folders the format's tooling has always used:
//!
//! ```text
//! <output>/block/<name>.sbl
//! <output>/building/<name>.sbb
//! <output>/texture/<name>.png
//! <output>/texturematerial/<name>.png
//! <output>/texturematerial/<name>/<material name>.png
//! ```
//!
//! A material named like its texture sits directly in `texturematerial/`;
//! any other material goes into a folder named after the owning texture, so
//! `pack` can pair it back without guessing.

use crate::commands::{read_file, write_file};
use crate::config::UnpackArgs;
use crate::error::{CliError, Result};
use csxkit_formats::csx::{AssetKind, CsxArchive, MATERIAL_FOLDER};
use csxkit_formats::format_file_size;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Run the `unpack` subcommand.
pub fn run(args: &UnpackArgs) -> Result<String> {
    let data = read_file(&args.archive)?;
    let archive = CsxArchive::parse_with(&data, &args.parse_options())?;
    info!(
        "Read {} assets from {} ({})",
        archive.len(),
        args.archive.display(),
        format_file_size(data.len() as u64)
    );

    let written = export_archive(&archive, &args.output)?;
    Ok(format!(
        "Unpacked {} files to {}",
        written.len(),
        args.output.display()
    ))
}

/// Write every asset and material of `archive` below `dir`.
///
/// Returns the paths written, in archive order. When two assets map to the
/// same file the later one wins.
pub fn export_archive(archive: &CsxArchive, dir: &Path) -> Result<Vec<PathBuf>> {
    let folders = AssetKind::ALL
        .iter()
        .map(|kind| kind.folder())
        .chain([MATERIAL_FOLDER]);
    for folder in folders {
        let path = dir.join(folder);
        std::fs::create_dir_all(&path).map_err(|e| CliError::write(&path, e))?;
    }

    let mut written = Vec::new();
    let mut seen = HashSet::new();
    let mut emit = |path: PathBuf, data: &[u8]| -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::write(parent, e))?;
        }
        if !seen.insert(path.clone()) {
            warn!("Overwriting {} with a later asset of the same name", path.display());
        }
        debug!("Writing {} ({} bytes)", path.display(), data.len());
        write_file(&path, data)?;
        written.push(path);
        Ok(())
    };

    for asset in archive {
        let kind = asset.kind();
        let file = format!("{}.{}", sanitize_file_stem(asset.name()), kind.extension());
        emit(dir.join(kind.folder()).join(file), asset.data())?;

        if let Some(material) = asset.material() {
            emit(dir.join(material_path(asset.name(), &material.name)), &material.data)?;
        }
    }

    Ok(written)
}

/// Relative path of a material file, given its texture and material names
pub fn material_path(texture: &str, material: &str) -> PathBuf {
    let texture = sanitize_file_stem(texture);
    let material = sanitize_file_stem(material);
    let file = format!("{material}.{}", AssetKind::Texture.extension());

    let folder = Path::new(MATERIAL_FOLDER);
    if texture == material {
        folder.join(file)
    } else {
        folder.join(texture).join(file)
    }
}

/// Turn an asset name into a single safe path component.
///
/// Path separators and control characters become `_`; names that are empty
/// or made only of dots become `unnamed`.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use csxkit_formats::csx::{Asset, Material};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("rock"), "rock");
        assert_eq!(sanitize_file_stem("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_file_stem("a\\b\0c"), "a_b_c");
        assert_eq!(sanitize_file_stem(""), "unnamed");
        assert_eq!(sanitize_file_stem(".."), "unnamed");
    }

    #[test]
    fn test_export_layout() {
        let dir = tempfile::tempdir().expect("Operation should succeed");
        let archive = CsxArchive::from_assets(vec![
            Asset::block("rock", vec![1, 2]),
            Asset::building("hut", vec![1, 3]),
            Asset::texture_with_material("stone", vec![9], Material::new("stone_gloss", vec![8])),
        ]);

        let written = export_archive(&archive, dir.path()).expect("Operation should succeed");
        let relative: Vec<PathBuf> = written
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("block/rock.sbl"),
                PathBuf::from("building/hut.sbb"),
                PathBuf::from("texture/stone.png"),
                PathBuf::from("texturematerial/stone/stone_gloss.png"),
            ]
        );
        assert_eq!(
            std::fs::read(dir.path().join("texturematerial/stone/stone_gloss.png")).unwrap(),
            vec![8]
        );
    }

    #[test]
    fn test_material_path() {
        assert_eq!(
            material_path("stone", "stone"),
            PathBuf::from("texturematerial/stone.png")
        );
        assert_eq!(
            material_path("stone", "stone_gloss"),
            PathBuf::from("texturematerial/stone/stone_gloss.png")
        );
        assert_eq!(
            material_path("a/b", ".."),
            PathBuf::from("texturematerial/a_b/unnamed.png")
        );
    }

    #[test]
    fn test_export_creates_empty_folders() {
        let dir = tempfile::tempdir().expect("Operation should succeed");
        let written =
            export_archive(&CsxArchive::new(), dir.path()).expect("Operation should succeed");
        assert!(written.is_empty());
        for folder in ["block", "building", "texture", "texturematerial"] {
            assert!(dir.path().join(folder).is_dir());
        }
    }
}
