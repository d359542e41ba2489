//! The JSON descriptor at the catalog URL.

use serde::{Deserialize, Serialize};

/// Top-level catalog descriptor (the `esmcat` document).
///
/// Only the fields this dashboard consumes are modelled; unknown fields such
/// as `aggregation_control` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsmDescriptor {
    /// Spec version of the descriptor format.
    pub esmcat_version: Option<String>,
    /// Catalog identifier.
    pub id: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Location of the CSV index, absolute or relative to the descriptor.
    pub catalog_file: String,
    /// Descriptions of the index columns.
    #[serde(default)]
    pub attributes: Vec<ColumnAttribute>,
    /// Which column holds the data asset path, and its format.
    pub assets: Option<AssetSpec>,
}

/// A described column of the CSV index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnAttribute {
    pub column_name: String,
    #[serde(default)]
    pub vocabulary: Option<String>,
}

/// Asset column description: where each row's data lives and in what format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSpec {
    pub column_name: String,
    #[serde(default)]
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_parses_full_document() {
        let json = r#"{
            "esmcat_version": "0.1.0",
            "id": "era5_catalog",
            "description": "ERA5 reanalysis catalog",
            "catalog_file": "era5_catalog.csv",
            "attributes": [
                {"column_name": "variable", "vocabulary": ""},
                {"column_name": "frequency"}
            ],
            "assets": {"column_name": "path", "format": "zarr"},
            "aggregation_control": {"variable_column_name": "variable"}
        }"#;
        let descriptor: EsmDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.catalog_file, "era5_catalog.csv");
        assert_eq!(descriptor.id.as_deref(), Some("era5_catalog"));
        assert_eq!(descriptor.attributes.len(), 2);
        assert_eq!(descriptor.attributes[0].column_name, "variable");
        let assets = descriptor.assets.unwrap();
        assert_eq!(assets.column_name, "path");
        assert_eq!(assets.format.as_deref(), Some("zarr"));
    }

    #[test]
    fn test_descriptor_requires_catalog_file() {
        let json = r#"{"id": "era5_catalog"}"#;
        assert!(serde_json::from_str::<EsmDescriptor>(json).is_err());
    }
}
