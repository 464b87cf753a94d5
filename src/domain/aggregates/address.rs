//! Address book entries embedded in the user aggregate.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::StorageId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: StorageId,
    pub house_name: String,
    pub street_name: String,
    pub city_name: String,
    pub pin_code: String,
}

/// Request body for a new address; every field is required and non-empty.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct NewAddress {
    #[validate(required, length(min = 1))]
    pub house_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub street_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub city_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub pin_code: Option<String>,
}

impl NewAddress {
    /// Returns `None` unless all four fields are present and non-empty.
    pub fn into_address(self) -> Option<Address> {
        if self.validate().is_err() { return None; }
        Some(Address {
            id: StorageId::generate(),
            house_name: self.house_name?,
            street_name: self.street_name?,
            city_name: self.city_name?,
            pin_code: self.pin_code?,
        })
    }
}

/// Partial update; empty strings leave the field untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AddressPatch {
    pub house_name: Option<String>,
    pub street_name: Option<String>,
    pub city_name: Option<String>,
    pub pin_code: Option<String>,
}

impl AddressPatch {
    pub fn apply(self, address: &mut Address) {
        let set = |field: &mut String, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.is_empty()) { *field = v; }
        };
        set(&mut address.house_name, self.house_name);
        set(&mut address.street_name, self.street_name);
        set(&mut address.city_name, self.city_name);
        set(&mut address.pin_code, self.pin_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> NewAddress {
        NewAddress {
            house_name: Some("12B".into()), street_name: Some("Baker Street".into()),
            city_name: Some("London".into()), pin_code: Some("NW1".into()),
        }
    }

    #[test]
    fn test_new_address_requires_all_fields() {
        assert!(full().into_address().is_some());
        assert!(NewAddress { pin_code: None, ..full() }.into_address().is_none());
        assert!(NewAddress { city_name: Some(String::new()), ..full() }.into_address().is_none());
    }

    #[test]
    fn test_patch_merges_present_fields() {
        let mut address = full().into_address().unwrap();
        AddressPatch { city_name: Some("Leeds".into()), pin_code: Some(String::new()), ..Default::default() }
            .apply(&mut address);
        assert_eq!(address.city_name, "Leeds");
        assert_eq!(address.pin_code, "NW1");
        assert_eq!(address.house_name, "12B");
    }
}
