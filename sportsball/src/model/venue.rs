use serde::{Deserialize, Serialize};

use crate::interest::{more_interesting, Combine};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub housenumber: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

impl Combine for Address {
    fn combine(self, candidate: Self) -> Self {
        Self {
            housenumber: more_interesting(self.housenumber, candidate.housenumber),
            city: more_interesting(self.city, candidate.city),
            state: more_interesting(self.state, candidate.state),
            zipcode: more_interesting(self.zipcode, candidate.zipcode),
            country: more_interesting(self.country, candidate.country),
            latitude: more_interesting(self.latitude, candidate.latitude),
            longitude: more_interesting(self.longitude, candidate.longitude),
            timezone: more_interesting(self.timezone, candidate.timezone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub is_grass: Option<bool>,
    #[serde(default)]
    pub is_indoor: Option<bool>,
}
impl Venue {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            address: None,
            is_grass: None,
            is_indoor: None,
        }
    }
}

/// Field-wise merge. The identifier is carried over from the candidate; the venue merger
/// overwrites it with the resolved identity.
impl Combine for Venue {
    fn combine(self, candidate: Self) -> Self {
        Self {
            identifier: candidate.identifier,
            name: candidate.name,
            address: self.address.combine(candidate.address),
            is_grass: more_interesting(self.is_grass, candidate.is_grass),
            is_indoor: more_interesting(self.is_indoor, candidate.is_indoor),
        }
    }
}
