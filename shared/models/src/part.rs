//! Part domain model.
//!
//! A part is one grouped BOM line item. The BOM reader fills in `fields` and
//! `refs`; the pricing engine reads the fields and fills in `dd`, one
//! [`DistData`] per distributor.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::dist_data::DistData;

/// Field holding the manufacturer name.
pub const FIELD_MANUFACTURER: &str = "manf";
/// Field holding the manufacturer part number.
pub const FIELD_MANUFACTURER_PN: &str = "manf#";
/// Lifecycle assumed when the provider does not report one.
pub const DEFAULT_LIFECYCLE: &str = "active";

/// One BOM line item being priced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub refs: BTreeSet<String>,
    /// Canonical pricing per distributor, keyed by internal distributor id.
    #[serde(default)]
    pub dd: BTreeMap<String, DistData>,
    #[serde(default)]
    pub datasheet: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<String>,
    /// Provider spec table, key -> value.
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

impl Default for Part {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            fields: BTreeMap::new(),
            refs: BTreeSet::new(),
            dd: BTreeMap::new(),
            datasheet: None,
            lifecycle: None,
            specs: BTreeMap::new(),
        }
    }
}

impl Part {
    /// Creates a part covering the given reference designators.
    pub fn new<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            refs: refs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns a field value, treating blank values as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Name of the field carrying a distributor's own stock code, e.g. `digikey#`.
    pub fn stock_code_field(distributor: &str) -> String {
        format!("{}#", distributor)
    }

    /// The distributor-specific stock code, if the BOM provides one.
    pub fn stock_code(&self, distributor: &str) -> Option<&str> {
        self.field(&Self::stock_code_field(distributor))
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.field(FIELD_MANUFACTURER)
    }

    pub fn manufacturer_pn(&self) -> Option<&str> {
        self.field(FIELD_MANUFACTURER_PN)
    }

    /// Reference designators joined for log output, e.g. `C1,C2`.
    pub fn refs_label(&self) -> String {
        self.refs.iter().cloned().collect::<Vec<_>>().join(",")
    }

    /// Gets or lazily creates the accumulator for a distributor.
    pub fn dist_data_mut(&mut self, distributor: &str) -> &mut DistData {
        self.dd.entry(distributor.to_string()).or_default()
    }

    /// Merges provider spec entries, skipping empty values.
    pub fn update_specs<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in entries {
            if !value.trim().is_empty() {
                self.specs.insert(key.to_string(), value.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_absent() {
        let part = Part::new(["R1"])
            .with_field(FIELD_MANUFACTURER, "  ")
            .with_field(FIELD_MANUFACTURER_PN, " RC0603 ");

        assert_eq!(part.manufacturer(), None);
        assert_eq!(part.manufacturer_pn(), Some("RC0603"));
    }

    #[test]
    fn test_stock_code_lookup() {
        let part = Part::new(["U1"]).with_field("digikey#", "296-1234-1-ND");

        assert_eq!(Part::stock_code_field("mouser"), "mouser#");
        assert_eq!(part.stock_code("digikey"), Some("296-1234-1-ND"));
        assert_eq!(part.stock_code("mouser"), None);
    }

    #[test]
    fn test_dist_data_created_once() {
        let mut part = Part::new(["C1", "C2"]);
        part.dist_data_mut("digikey").moq = Some(10);
        part.dist_data_mut("digikey").qty_avail = Some(500);

        assert_eq!(part.dd.len(), 1);
        assert_eq!(part.dd["digikey"].moq, Some(10));
        assert_eq!(part.refs_label(), "C1,C2");
    }

    #[test]
    fn test_update_specs_skips_empty_values() {
        let mut part = Part::default();
        part.update_specs([("package", "0603"), ("tolerance", "")]);

        assert_eq!(part.specs.len(), 1);
        assert_eq!(part.specs["package"], "0603");
    }

    #[test]
    fn test_deserialize_minimal_part() {
        let part: Part = serde_json::from_value(serde_json::json!({
            "fields": {"manf": "ACME", "manf#": "XYZ-1"},
            "refs": ["U3"]
        }))
        .unwrap();

        assert_eq!(part.manufacturer(), Some("ACME"));
        assert!(part.dd.is_empty());
    }
}
