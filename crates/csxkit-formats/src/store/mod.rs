//! Handle-addressed collection of assets
//!
//! [`AssetStore`] is the editable working set a front end keeps between
//! loading files and building an archive. Assets are addressed by opaque
//! [`AssetId`] handles instead of by position or identity, so removing one
//! asset never invalidates the handles of the others. Handles are never
//! reused.
//!
//! ```rust
//! use csxkit_formats::csx::{Asset, Material};
//! use csxkit_formats::store::{AssetStore, SortDirection, SortKey};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = AssetStore::new();
//! let rock = store.insert(Asset::block("rock", vec![0; 16]));
//! let grass = store.insert(Asset::texture("grass", vec![0; 64]));
//!
//! store.attach_material(grass, Material::new("grass_shine", vec![0; 8]))?;
//! store.remove(rock)?;
//!
//! let by_size = store.sorted(SortKey::Size, SortDirection::Descending);
//! assert_eq!(by_size[0].0, grass);
//!
//! let data = store.to_archive().build()?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{Result, StoreError};

use crate::csx::{Asset, AssetKind, CsxArchive, Material};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque handle to an asset in an [`AssetStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Field used to order a sorted view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Asset name, case-insensitive
    #[default]
    Name,
    /// Payload size including material bytes
    Size,
    /// File extension of the asset kind
    Kind,
}

/// Direction of a sorted view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

/// Editable, insertion-ordered collection of assets
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    // Handles grow monotonically, so key order is insertion order
    assets: BTreeMap<AssetId, Asset>,
    next_id: u64,
}

impl AssetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the assets of `archive`, in archive order
    pub fn from_archive(archive: CsxArchive) -> Self {
        let mut store = Self::new();
        store.extend(archive);
        store
    }

    /// Add an asset and return its handle
    pub fn insert(&mut self, asset: Asset) -> AssetId {
        let id = AssetId(self.next_id);
        self.next_id += 1;
        self.assets.insert(id, asset);
        id
    }

    /// Look up an asset
    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    /// Look up an asset for editing
    pub fn get_mut(&mut self, id: AssetId) -> Option<&mut Asset> {
        self.assets.get_mut(&id)
    }

    /// Whether `id` refers to a live asset
    pub fn contains(&self, id: AssetId) -> bool {
        self.assets.contains_key(&id)
    }

    /// Remove an asset, returning it
    pub fn remove(&mut self, id: AssetId) -> Result<Asset> {
        self.assets.remove(&id).ok_or(StoreError::UnknownAsset(id))
    }

    /// Remove every asset
    ///
    /// Handles issued before the call stay invalid afterwards.
    pub fn clear(&mut self) {
        self.assets.clear();
    }

    /// Attach a material to a texture, returning the material it replaces
    pub fn attach_material(&mut self, id: AssetId, material: Material) -> Result<Option<Material>> {
        let slot = self.material_slot(id)?;
        Ok(slot.replace(material))
    }

    /// Remove the material of a texture, returning it
    pub fn detach_material(&mut self, id: AssetId) -> Result<Option<Material>> {
        let slot = self.material_slot(id)?;
        Ok(slot.take())
    }

    fn material_slot(&mut self, id: AssetId) -> Result<&mut Option<Material>> {
        let asset = self
            .assets
            .get_mut(&id)
            .ok_or(StoreError::UnknownAsset(id))?;
        let kind = asset.kind();
        asset
            .material_slot()
            .ok_or(StoreError::NotATexture { id, kind })
    }

    /// Find the first asset of `kind` named `name`
    pub fn find_by_name(&self, kind: AssetKind, name: &str) -> Option<AssetId> {
        self.assets
            .iter()
            .find(|(_, asset)| asset.kind() == kind && asset.name() == name)
            .map(|(&id, _)| id)
    }

    /// Number of assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterate over assets in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (AssetId, &Asset)> {
        self.assets.iter().map(|(&id, asset)| (id, asset))
    }

    /// Handles in insertion order
    pub fn ids(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.assets.keys().copied()
    }

    /// Sorted view of the store
    ///
    /// Ties keep insertion order.
    pub fn sorted(&self, key: SortKey, direction: SortDirection) -> Vec<(AssetId, &Asset)> {
        let mut view: Vec<_> = self.iter().collect();
        view.sort_by(|(_, a), (_, b)| {
            let ordering = compare(a, b, key);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        view
    }

    /// Total payload bytes held, including materials
    pub fn total_size(&self) -> u64 {
        self.assets.values().map(|a| a.payload_len() as u64).sum()
    }

    /// Copy the assets into an archive, in insertion order
    pub fn to_archive(&self) -> CsxArchive {
        CsxArchive::from_assets(self.assets.values().cloned().collect())
    }

    /// Move the assets into an archive, in insertion order
    pub fn into_archive(self) -> CsxArchive {
        CsxArchive::from_assets(self.assets.into_values().collect())
    }
}

fn compare(a: &Asset, b: &Asset, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortKey::Size => a.payload_len().cmp(&b.payload_len()),
        SortKey::Kind => a.kind().extension().cmp(b.kind().extension()),
    }
}

impl Extend<Asset> for AssetStore {
    fn extend<I: IntoIterator<Item = Asset>>(&mut self, iter: I) {
        for asset in iter {
            self.insert(asset);
        }
    }
}

impl FromIterator<Asset> for AssetStore {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

/// Format a byte count for display, e.g. `1.50 KiB`
///
/// Uses binary units from `bytes` up to `TiB` with two decimals; zero is
/// shown as `0 bytes`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "KiB", "MiB", "GiB", "TiB"];

    if bytes == 0 {
        return "0 bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", UNITS[unit])
}
