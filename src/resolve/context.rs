//! Lookup state threaded through the four persistence passes.

use hashbrown::HashMap;

use crate::error::ResolveError;
use crate::models::{Level, PlaceRecord};

use super::{LinearIndex, ParentIndex, ParentRef};

/// Resolved parent row ids for one child candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub country_id: i64,
    pub city_id: Option<i64>,
    pub district_id: Option<i64>,
}

/// Already-persisted parents, keyed by ISO code.
///
/// Each pass registers what it created so later passes can attach children to
/// it. Cities and districts are indexed per country, which keeps every
/// nearest-neighbour search scoped to the child's own country.
pub struct HierarchyContext<I: ParentIndex = LinearIndex> {
    countries: HashMap<String, ParentRef>,
    cities: HashMap<String, I>,
    districts: HashMap<String, I>,
}

impl<I: ParentIndex> Default for HierarchyContext<I> {
    fn default() -> Self {
        Self {
            countries: HashMap::new(),
            cities: HashMap::new(),
            districts: HashMap::new(),
        }
    }
}

impl<I: ParentIndex> HierarchyContext<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a freshly created row visible to later passes.
    ///
    /// Towns are leaves and are not kept.
    pub fn register(&mut self, level: Level, country_code: &str, parent: ParentRef) {
        match level {
            Level::Country => {
                self.countries.insert(country_code.to_string(), parent);
            }
            Level::City => self
                .cities
                .entry_ref(country_code)
                .or_default()
                .insert(parent),
            Level::District => self
                .districts
                .entry_ref(country_code)
                .or_default()
                .insert(parent),
            Level::Town => {}
        }
    }

    pub fn country_id(&self, country_code: &str) -> Result<i64, ResolveError> {
        self.countries
            .get(country_code)
            .map(|c| c.id)
            .ok_or_else(|| ResolveError::UnknownCountry(country_code.to_string()))
    }

    pub fn nearest_city(&self, record: &PlaceRecord) -> Option<&ParentRef> {
        self.cities
            .get(record.country_code.as_str())
            .and_then(|index| index.nearest(record.point()))
    }

    pub fn nearest_district(&self, record: &PlaceRecord) -> Option<&ParentRef> {
        self.districts
            .get(record.country_code.as_str())
            .and_then(|index| index.nearest(record.point()))
    }

    /// Parents for a candidate of the given level.
    ///
    /// The country is required; a missing one is an error. City and district
    /// links are optional and simply left empty when the country has none.
    pub fn resolve(&self, level: Level, record: &PlaceRecord) -> Result<Links, ResolveError> {
        let country_id = self.country_id(&record.country_code)?;

        let (city_id, district_id) = match level {
            Level::Country | Level::City => (None, None),
            Level::District => (self.nearest_city(record).map(|c| c.id), None),
            Level::Town => (
                self.nearest_city(record).map(|c| c.id),
                self.nearest_district(record).map(|d| d.id),
            ),
        };

        Ok(Links {
            country_id,
            city_id,
            district_id,
        })
    }
}
