use serde::{Deserialize, Serialize};

use lendkit_core::{DomainError, Entity, string_id};

string_id!(
    /// Item identifier.
    ///
    /// Allocated by the store as the decimal string of the next integer above
    /// the current maximum (see [`next_item_id`]).
    pub struct ItemId, "ItemId"
);

impl ItemId {
    /// Numeric value of the id, if it is a decimal integer.
    pub fn numeric(&self) -> Option<u64> {
        self.as_str().trim().parse().ok()
    }
}

/// Status label assigned to every newly created item.
pub const AVAILABLE_STATUS: &str = "Available";

/// A borrowable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Free-text label. The store only ever writes [`AVAILABLE_STATUS`].
    pub status: String,
    /// Opaque reference to a locally picked image; may be empty.
    #[serde(default)]
    pub image_url: String,
    pub available_units: u32,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Item {
    /// Build a new catalog entry from user input under a freshly allocated id.
    pub fn create(id: ItemId, new: NewItem) -> Self {
        Self {
            id,
            name: new.name,
            status: AVAILABLE_STATUS.to_string(),
            image_url: new.image_url,
            available_units: new.available_units,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available_units > 0
    }

    /// Add `delta` to the available units, clamping at zero.
    pub fn adjust_units(&mut self, delta: i64) {
        let next = i64::from(self.available_units).saturating_add(delta);
        self.available_units = next.clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// Merge a partial update into this item.
    pub fn apply(&mut self, changes: ItemChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(image_url) = changes.image_url {
            self.image_url = image_url;
        }
        if let Some(units) = changes.available_units {
            self.available_units = units;
        }
    }
}

/// Input for adding an item to the catalog.
///
/// Required-field checks belong to the caller; [`NewItem::validate`] is offered
/// for callers that want the standard entry-path rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub available_units: u32,
}

impl NewItem {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>, available_units: u32) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
            available_units,
        }
    }

    /// Standard entry path: a name and an image are both required.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.image_url.trim().is_empty() {
            return Err(DomainError::validation("an image is required"));
        }
        Ok(())
    }
}

/// Partial update for an existing item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemChanges {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub available_units: Option<u32>,
}

impl ItemChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn available_units(mut self, units: u32) -> Self {
        self.available_units = Some(units);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image_url.is_none() && self.available_units.is_none()
    }
}

/// Allocate the id for the next item: one above the highest numeric id, or `1`
/// for an empty catalog. Ids that are not decimal integers are ignored.
pub fn next_item_id(items: &[Item]) -> ItemId {
    let max = items.iter().filter_map(|i| i.id.numeric()).max().unwrap_or(0);
    ItemId::new(max.saturating_add(1).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_item(id: &str, units: u32) -> Item {
        Item::create(ItemId::from(id), NewItem::new("Microscope", "file:///scope.jpg", units))
    }

    #[test]
    fn create_forces_available_status() {
        let item = test_item("1", 3);
        assert_eq!(item.status, AVAILABLE_STATUS);
        assert_eq!(item.available_units, 3);
    }

    #[test]
    fn adjust_units_clamps_at_zero() {
        let mut item = test_item("1", 0);
        item.adjust_units(-1);
        assert_eq!(item.available_units, 0);

        item.adjust_units(2);
        item.adjust_units(-5);
        assert_eq!(item.available_units, 0);
    }

    #[test]
    fn availability_tracks_units() {
        assert!(!test_item("1", 0).is_available());
        assert!(test_item("2", 1).is_available());
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let mut item = test_item("1", 3);
        item.apply(ItemChanges::default().available_units(9));

        assert_eq!(item.available_units, 9);
        assert_eq!(item.name, "Microscope");
        assert_eq!(item.image_url, "file:///scope.jpg");
    }

    #[test]
    fn next_item_id_starts_at_one() {
        assert_eq!(next_item_id(&[]), ItemId::from("1"));
    }

    #[test]
    fn next_item_id_skips_gaps_and_non_numeric_ids() {
        let items = vec![test_item("2", 1), test_item("legacy", 1), test_item("7", 1)];
        assert_eq!(next_item_id(&items), ItemId::from("8"));
    }

    #[test]
    fn new_item_validation_requires_name_and_image() {
        assert!(NewItem::new("  ", "img", 1).validate().is_err());
        assert!(NewItem::new("Beaker", "", 1).validate().is_err());
        assert!(NewItem::new("Beaker", "img", 0).validate().is_ok());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(test_item("4", 2)).unwrap();
        assert_eq!(json["id"], "4");
        assert_eq!(json["imageUrl"], "file:///scope.jpg");
        assert_eq!(json["availableUnits"], 2);
        assert_eq!(json["status"], "Available");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: adjusting by any delta yields max(0, v + delta).
        #[test]
        fn adjust_units_is_clamped_sum(start in 0u32..10_000, delta in -20_000i64..20_000) {
            let mut item = test_item("1", start);
            item.adjust_units(delta);
            let expected = (i64::from(start) + delta).max(0);
            prop_assert_eq!(i64::from(item.available_units), expected);
        }

        /// Property: the allocated id is strictly above every existing numeric id.
        #[test]
        fn next_item_id_exceeds_existing(ids in prop::collection::vec(1u64..1_000_000, 0..20)) {
            let items: Vec<Item> = ids.iter().map(|id| test_item(&id.to_string(), 1)).collect();
            let next = next_item_id(&items).numeric().unwrap();
            prop_assert!(ids.iter().all(|id| next > *id));
        }
    }
}
