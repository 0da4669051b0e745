//! Parser and builder for CSX asset bundles
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::cast_precision_loss)] // Display-only size formatting
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
//! This crate provides symmetric (parser and builder) support for the CSX
//! container: a single flat file holding block, building and texture assets,
//! where each texture may carry one attached material image.
//!
//! # Modules
//!
//! - [`csx`]: the binary format itself (header, data region, lookup table,
//!   texture sub-header) and the asset model
//! - [`store`]: a handle-addressed working set of assets for editors that
//!   add, remove, rename and sort assets before building
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: both parsing and building supported
//! - **Checked Reads**: every offset taken from the file is bounds-checked
//! - **Round-Trip Guarantee**: `decode(encode(assets))` reproduces the assets,
//!   apart from the marker byte written into block and building payloads

#![warn(missing_docs)]

pub mod csx;
pub mod store;

pub use csx::{Asset, AssetKind, CsxArchive, CsxBuilder, CsxError, Material};
pub use csx::{decode_archive, encode_archive};
pub use store::{AssetId, AssetStore, StoreError, format_file_size};
