//! `pack`: build an archive from loose asset files.

use crate::commands::{read_file, write_file};
use crate::config::{MaterialSpec, PackArgs};
use crate::error::{CliError, Result};
use csxkit_formats::csx::{Asset, AssetKind, MATERIAL_FOLDER, Material};
use csxkit_formats::store::{AssetId, AssetStore};
use csxkit_formats::format_file_size;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Run the `pack` subcommand.
pub fn run(args: &PackArgs) -> Result<String> {
    let mut store = collect_inputs(&args.inputs)?;
    for spec in &args.materials {
        attach_material_spec(&mut store, spec)?;
    }

    let archive = store.into_archive();
    let stats = archive.stats();
    let data = archive.build_with(&args.build_options())?;
    write_file(&args.output, &data)?;

    info!(
        "Packed {} blocks, {} buildings, {} textures ({} with materials)",
        stats.blocks, stats.buildings, stats.textures, stats.materials
    );
    Ok(format!(
        "Packed {} assets into {} ({})",
        archive.len(),
        args.output.display(),
        format_file_size(data.len() as u64)
    ))
}

/// Load every recognized asset file named by `inputs`.
///
/// Directories are walked recursively in file name order. Files below a
/// `texturematerial` folder are attached as materials once all inputs are
/// loaded: `texturematerial/<texture>/<material>.png` goes to the texture
/// named by the folder, `texturematerial/<name>.png` to the texture with the
/// same name. The material is named after the file stem. Files with other
/// extensions are skipped.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<AssetStore> {
    let mut store = AssetStore::new();
    let mut materials = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            load_asset(&mut store, input)?;
            continue;
        }

        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|source| CliError::Walk {
                path: input.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(texture) = material_owner(input, entry.path()) {
                materials.push((texture, entry.into_path()));
            } else {
                load_asset(&mut store, entry.path())?;
            }
        }
    }

    for (texture, path) in materials {
        match store.find_by_name(AssetKind::Texture, &texture) {
            Some(id) => attach(&mut store, id, file_stem(&path), &path)?,
            None => warn!(
                "Skipping material {}: no texture named '{}'",
                path.display(),
                texture
            ),
        }
    }

    Ok(store)
}

/// Attach the material named by an explicit `--material` pairing.
pub fn attach_material_spec(store: &mut AssetStore, spec: &MaterialSpec) -> Result<()> {
    let id = store
        .find_by_name(AssetKind::Texture, &spec.texture)
        .ok_or_else(|| CliError::UnknownTexture(spec.texture.clone()))?;
    attach(store, id, file_stem(&spec.path), &spec.path)
}

fn attach(store: &mut AssetStore, id: AssetId, name: String, path: &Path) -> Result<()> {
    let data = read_file(path)?;
    debug!("Attaching material {} to texture {}", path.display(), id);
    if let Some(previous) = store.attach_material(id, Material::new(name, data))? {
        debug!("Replaced material '{}'", previous.name);
    }
    Ok(())
}

fn load_asset(store: &mut AssetStore, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy())
        .unwrap_or_default();
    let Some(kind) = AssetKind::from_extension(&extension) else {
        debug!("Skipping {}: unsupported file type", path.display());
        return Ok(());
    };

    let data = read_file(path)?;
    debug!("Loaded {} as {} ({} bytes)", path.display(), kind.label(), data.len());
    store.insert(Asset::new(kind, file_stem(path), data));
    Ok(())
}

/// Name of the texture a file below a `texturematerial` folder belongs to
///
/// Returns `None` for files that are not materials.
fn material_owner(root: &Path, path: &Path) -> Option<String> {
    let parent = path.strip_prefix(root).ok()?.parent()?;
    let mut dirs = parent.components().rev().map(|c| c.as_os_str());

    let innermost = dirs.next()?;
    if innermost == MATERIAL_FOLDER {
        return Some(file_stem(path));
    }
    if dirs.next()? == MATERIAL_FOLDER {
        return Some(innermost.to_string_lossy().into_owned());
    }
    None
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(root: &Path, relative: &str, data: &[u8]) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_collect_directory() {
        let dir = tempfile::tempdir().expect("Operation should succeed");
        write(dir.path(), "block/rock.sbl", &[0, 1]);
        write(dir.path(), "building/hut.SBB", &[0, 2]);
        write(dir.path(), "texture/stone.png", &[3]);
        write(dir.path(), "texture/sky.png", &[6]);
        write(dir.path(), "texturematerial/stone.png", &[4]);
        write(dir.path(), "texturematerial/orphan.png", &[5]);
        write(dir.path(), "texturematerial/sky/stone.png", &[7]);
        write(dir.path(), "readme.txt", b"ignored");

        let store =
            collect_inputs(&[dir.path().to_path_buf()]).expect("Operation should succeed");
        let names: Vec<(AssetKind, &str)> =
            store.iter().map(|(_, a)| (a.kind(), a.name())).collect();
        assert_eq!(
            names,
            vec![
                (AssetKind::Block, "rock"),
                (AssetKind::Building, "hut"),
                (AssetKind::Texture, "sky"),
                (AssetKind::Texture, "stone"),
            ]
        );

        let stone = store.find_by_name(AssetKind::Texture, "stone").unwrap();
        let material = store.get(stone).and_then(Asset::material).unwrap();
        assert_eq!(material, &Material::new("stone", vec![4]));

        // A material named after another texture stays with its folder's texture
        let sky = store.find_by_name(AssetKind::Texture, "sky").unwrap();
        let material = store.get(sky).and_then(Asset::material).unwrap();
        assert_eq!(material, &Material::new("stone", vec![7]));
    }

    #[test]
    fn test_explicit_material() {
        let dir = tempfile::tempdir().expect("Operation should succeed");
        let texture = write(dir.path(), "stone.png", &[3]);
        let gloss = write(dir.path(), "mats/stone_gloss.png", &[7]);

        let mut store = collect_inputs(&[texture]).expect("Operation should succeed");
        let spec = MaterialSpec {
            texture: "stone".to_string(),
            path: gloss,
        };
        attach_material_spec(&mut store, &spec).expect("Operation should succeed");

        let (_, asset) = store.iter().next().unwrap();
        assert_eq!(asset.material().map(|m| m.name.as_str()), Some("stone_gloss"));

        let missing = MaterialSpec {
            texture: "sky".to_string(),
            path: spec.path,
        };
        assert!(matches!(
            attach_material_spec(&mut store, &missing),
            Err(CliError::UnknownTexture(name)) if name == "sky"
        ));
    }

    #[test]
    fn test_material_owner() {
        let root = Path::new("/assets");
        let owner = |p: &str| material_owner(root, Path::new(p));

        assert_eq!(owner("/assets/texturematerial/a.png").as_deref(), Some("a"));
        assert_eq!(owner("/assets/texturematerial/b/a_gloss.png").as_deref(), Some("b"));
        assert_eq!(
            owner("/assets/pack/texturematerial/c/x.png").as_deref(),
            Some("c")
        );
        assert_eq!(owner("/assets/texture/a.png"), None);
        assert_eq!(owner("/assets/texturematerial.png"), None);
        assert_eq!(owner("/assets/texturematerial/b/deeper/x.png"), None);
    }
}
