//! `list`: print the lookup table of an archive.

use crate::commands::read_file;
use crate::config::ListArgs;
use crate::error::Result;
use csxkit_formats::csx::{ParseOptions, entry_payload, read_table};
use csxkit_formats::format_file_size;
use serde::Serialize;
use std::fmt::Write as _;

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    /// Position in the lookup table
    pub index: usize,
    /// Kind folder name, or `unknown(0x..)` for unrecognized tags
    pub kind: String,
    /// Name stored in the table
    pub name: String,
    /// Absolute data offset
    pub offset: u32,
    /// Size field as stored
    pub size: u32,
    /// Bytes the entry actually occupies in the data region
    pub footprint: u64,
    /// Hex MD5 of the payload (texture bytes only for textures)
    pub md5: String,
    /// Attached material name, for textures carrying one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

/// Full listing of an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Offset of the lookup table
    pub table_offset: u32,
    /// Number of table entries
    pub entry_count: u32,
    /// Table rows in on-disk order
    pub rows: Vec<ListRow>,
}

/// Run the `list` subcommand.
pub fn run(args: &ListArgs) -> Result<String> {
    let data = read_file(&args.archive)?;
    let listing = list_archive(&data, &args.parse_options())?;

    if args.json {
        Ok(serde_json::to_string_pretty(&listing)?)
    } else {
        Ok(render_table(&listing))
    }
}

/// Describe every table entry of `data`.
pub fn list_archive(data: &[u8], options: &ParseOptions) -> Result<Listing> {
    let table = read_table(data, options)?;
    let extents = table.extents(data)?;

    let rows = table
        .entries
        .iter()
        .zip(&extents)
        .enumerate()
        .map(|(index, (entry, extent))| -> Result<ListRow> {
            let payload = entry_payload(data, entry)?;
            Ok(ListRow {
                index,
                kind: entry.kind().map_or_else(
                    || format!("unknown({:#04x})", entry.tag),
                    |k| k.folder().to_string(),
                ),
                name: entry.name.clone(),
                offset: entry.offset,
                size: entry.size,
                footprint: extent.len,
                md5: hex::encode(md5::compute(payload.data).0),
                material: payload.material.map(|(name, _)| name),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Listing {
        table_offset: table.header.table_offset,
        entry_count: table.header.entry_count,
        rows,
    })
}

fn render_table(listing: &Listing) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<10} {:<32} {:>10} {:>10} {:>10}  MD5",
        "#", "KIND", "NAME", "OFFSET", "SIZE", "FOOTPRINT"
    );

    for row in &listing.rows {
        let name = match &row.material {
            Some(material) => format!("{} (+{})", row.name, material),
            None => row.name.clone(),
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<10} {:<32} {:>10} {:>10} {:>10}  {}",
            row.index, row.kind, name, row.offset, row.size, row.footprint, row.md5
        );
    }

    let total: u64 = listing.rows.iter().map(|r| r.footprint).sum();
    let _ = write!(
        out,
        "{} entries, {} in data region",
        listing.rows.len(),
        format_file_size(total)
    );
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use csxkit_formats::csx::{Asset, CsxArchive, Material};
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<u8> {
        CsxArchive::from_assets(vec![
            Asset::block("rock", vec![0x00, 0x01, 0x02, 0x03]),
            Asset::texture_with_material("stone", vec![9; 10], Material::new("gloss", vec![8; 6])),
        ])
        .build()
        .expect("Operation should succeed")
    }

    #[test]
    fn test_list_rows() {
        let data = sample();
        let listing =
            list_archive(&data, &ParseOptions::default()).expect("Operation should succeed");

        assert_eq!(listing.entry_count, 2);
        assert_eq!(listing.table_offset, 12 + 4 + 76 + 10 + 6);

        let rock = &listing.rows[0];
        assert_eq!(rock.kind, "block");
        assert_eq!((rock.offset, rock.size, rock.footprint), (12, 4, 4));
        assert_eq!(
            rock.md5,
            hex::encode(md5::compute([0x01u8, 0x01, 0x02, 0x03]).0)
        );

        let stone = &listing.rows[1];
        assert_eq!(stone.kind, "texture");
        assert_eq!((stone.offset, stone.size, stone.footprint), (16, 10, 92));
        assert_eq!(stone.material.as_deref(), Some("gloss"));
        assert_eq!(stone.md5, hex::encode(md5::compute([9u8; 10]).0));
    }

    #[test]
    fn test_unnamed_material_takes_texture_name() {
        let data = CsxArchive::from_assets(vec![Asset::texture_with_material(
            "sky",
            vec![1, 2],
            Material::new("", vec![3]),
        )])
        .build()
        .expect("Operation should succeed");

        let listing =
            list_archive(&data, &ParseOptions::default()).expect("Operation should succeed");
        assert_eq!(listing.rows[0].material.as_deref(), Some("sky"));

        let decoded = CsxArchive::parse(&data).expect("Operation should succeed");
        assert_eq!(
            decoded.assets()[0].material().map(|m| m.name.as_str()),
            listing.rows[0].material.as_deref()
        );
    }

    #[test]
    fn test_render_and_json() {
        let data = sample();
        let listing =
            list_archive(&data, &ParseOptions::default()).expect("Operation should succeed");

        let text = render_table(&listing);
        assert!(text.contains("stone (+gloss)"));
        assert!(text.ends_with("2 entries, 96.00 bytes in data region"));

        let json: serde_json::Value =
            serde_json::to_value(&listing).expect("Operation should succeed");
        assert_eq!(json["rows"][0]["name"], "rock");
        assert!(json["rows"][0].get("material").is_none());
        assert_eq!(json["rows"][1]["material"], "gloss");
    }
}
