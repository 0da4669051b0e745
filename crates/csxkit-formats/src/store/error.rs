//! Error types for the asset store

use crate::csx::AssetKind;
use crate::store::AssetId;
use thiserror::Error;

/// Errors that can occur when editing an asset store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Handle does not refer to a live asset
    #[error("Unknown asset handle: {0}")]
    UnknownAsset(AssetId),

    /// Materials can only be attached to textures
    #[error("Asset {id} is a {kind}, only textures carry materials")]
    NotATexture {
        /// Handle of the offending asset
        id: AssetId,
        /// Its actual kind
        kind: AssetKind,
    },
}

/// Type alias for asset store results
pub type Result<T> = std::result::Result<T, StoreError>;
