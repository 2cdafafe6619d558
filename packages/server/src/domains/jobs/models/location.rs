use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Geocoded place of a job or an applicant.
///
/// Immutable after construction. Equality is structural; coordinates compare
/// by total order, so `NaN` equals `NaN` and `0.0` differs from `-0.0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    address: String,
    latitude: f64,
    longitude: f64,

    #[serde(skip)]
    hash_code: OnceLock<u64>,
}

impl Location {
    pub fn new(address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            address: address.into(),
            latitude,
            longitude,
            hash_code: OnceLock::new(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Structural hash, computed on first use and cached
    pub fn hash_code(&self) -> u64 {
        *self.hash_code.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.latitude.to_bits().hash(&mut hasher);
            self.longitude.to_bits().hash(&mut hasher);
            self.address.hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.total_cmp(&other.latitude).is_eq()
            && self.longitude.total_cmp(&other.longitude).is_eq()
            && self.address == other.address
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location{{address={}, latitude={:.6}, longitude={:.6}}}",
            self.address, self.latitude, self.longitude
        )
    }
}
