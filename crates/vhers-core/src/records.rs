/// Owner records and match requests.
///
/// Both sides of a match carry the same identity and mailing-address
/// fields, held in [`OwnerIdentity`]. The JSON form uses the camelCase keys
/// of the PIN service (`lastName_1`, `addressLine_1`, ...).
///
/// A field holding an empty or whitespace-only string is treated exactly
/// like a missing field by every accessor.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identity and address fields shared by records and requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerIdentity {
    /// Given name(s) of an individual owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// First last name of an individual owner.
    #[serde(default, rename = "lastName_1", skip_serializing_if = "Option::is_none")]
    pub last_name_1: Option<String>,
    /// Second last name, for owners registered with two.
    #[serde(default, rename = "lastName_2", skip_serializing_if = "Option::is_none")]
    pub last_name_2: Option<String>,
    /// Incorporation number of a corporate owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorporation_number: Option<String>,
    /// First mailing address line.
    #[serde(default, rename = "addressLine_1", skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    /// Second mailing address line.
    #[serde(default, rename = "addressLine_2", skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Two-letter province or state abbreviation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Postal or zip code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl OwnerIdentity {
    pub fn given_name(&self) -> Option<&str> {
        present(self.given_name.as_ref())
    }

    /// Last names that are present, in field order.
    pub fn last_names(&self) -> Vec<&str> {
        [self.last_name_1.as_ref(), self.last_name_2.as_ref()]
            .into_iter()
            .filter_map(present)
            .collect()
    }

    pub fn incorporation_number(&self) -> Option<&str> {
        present(self.incorporation_number.as_ref())
    }

    pub fn address_line_1(&self) -> Option<&str> {
        present(self.address_line_1.as_ref())
    }

    /// Address lines 1 and 2 joined by a single space.
    pub fn address_line(&self) -> Option<String> {
        let parts: Vec<&str> = [self.address_line_1.as_ref(), self.address_line_2.as_ref()]
            .into_iter()
            .filter_map(present)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn city(&self) -> Option<&str> {
        present(self.city.as_ref())
    }

    pub fn province_abbreviation(&self) -> Option<&str> {
        present(self.province_abbreviation.as_ref())
    }

    pub fn country(&self) -> Option<&str> {
        present(self.country.as_ref())
    }

    pub fn postal_code(&self) -> Option<&str> {
        present(self.postal_code.as_ref())
    }
}

fn one_owner() -> u32 {
    1
}

/// A stored owner of one or more parcels. Never modified by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecord {
    #[serde(flatten)]
    pub identity: OwnerIdentity,
    /// Parcel identifiers (PIDs) held by this owner.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub pids: BTreeSet<String>,
    /// Number of owners registered on the title this record belongs to.
    #[serde(default = "one_owner")]
    pub number_of_owners: u32,
}

impl Default for OwnerRecord {
    fn default() -> Self {
        Self {
            identity: OwnerIdentity::default(),
            pids: BTreeSet::new(),
            number_of_owners: 1,
        }
    }
}

/// Identity details submitted with a PIN-recreation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(flatten)]
    pub identity: OwnerIdentity,
    /// Number of owners the requester says are on the title.
    pub number_of_owners: u32,
}
