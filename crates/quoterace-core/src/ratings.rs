use std::collections::BTreeMap;

use tracing::warn;

use crate::store::{SharedStore, RATINGS_KEY};
use crate::{StoreError, ValidationError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Star rating in `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::RatingOutOfRange {
                value,
                min: MIN_RATING,
                max: MAX_RATING,
            })
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Record-id to rating map persisted under a fixed key, no expiry.
#[derive(Clone)]
pub struct RatingsStore {
    store: SharedStore,
}

impl RatingsStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn get(&self, record_id: &str) -> Option<Rating> {
        self.all().get(record_id).copied()
    }

    pub fn save(&self, record_id: &str, rating: Rating) {
        let mut ratings = self.all();
        ratings.insert(record_id.to_owned(), rating);
        self.persist(&ratings);
    }

    /// Returns whether a rating existed.
    pub fn remove(&self, record_id: &str) -> bool {
        let mut ratings = self.all();
        let existed = ratings.remove(record_id).is_some();
        if existed {
            self.persist(&ratings);
        }
        existed
    }

    /// Every valid persisted rating; out-of-range values are dropped.
    pub fn all(&self) -> BTreeMap<String, Rating> {
        let raw = match self.store.get(RATINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(error) => {
                warn!(error = %error, "failed to read ratings, treating as empty");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str::<BTreeMap<String, i64>>(&raw) {
            Ok(values) => values
                .into_iter()
                .filter_map(|(id, value)| Rating::new(value).ok().map(|rating| (id, rating)))
                .collect(),
            Err(error) => {
                warn!(error = %error, "ratings are corrupt, treating as empty");
                BTreeMap::new()
            }
        }
    }

    fn persist(&self, ratings: &BTreeMap<String, Rating>) {
        let plain = ratings
            .iter()
            .map(|(id, rating)| (id.as_str(), rating.value()))
            .collect::<BTreeMap<_, _>>();
        let result = serde_json::to_string(&plain)
            .map_err(|source| StoreError::Encoding {
                key: String::from(RATINGS_KEY),
                source,
            })
            .and_then(|encoded| self.store.set(RATINGS_KEY, &encoded));

        if let Err(error) = result {
            warn!(error = %error, "failed to persist ratings");
        }
    }
}
