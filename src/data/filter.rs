use std::cmp::Ordering;

use super::model::Listing;

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// Inclusive rent bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentRange {
    pub min: f64,
    pub max: f64,
}

impl RentRange {
    /// Parse a `min-max` selector value. Anything malformed yields `None`,
    /// which the filter treats as "no constraint".
    pub fn parse(raw: &str) -> Option<Self> {
        let (min, max) = raw.trim().split_once('-')?;
        let min = min.trim().parse::<f64>().ok()?;
        let max = max.trim().parse::<f64>().ok()?;
        if min.is_nan() || max.is_nan() {
            return None;
        }
        Some(RentRange { min, max })
    }

    pub fn contains(&self, rent: f64) -> bool {
        self.min <= rent && rent <= self.max
    }
}

/// The user's constraints. A `None` / empty field constrains nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub rent_range: Option<RentRange>,
    pub rooms: Option<f64>,
    pub furnished: Option<String>,
    /// Already lower-cased; empty means no search.
    pub search: String,
}

impl FilterSpec {
    /// Build a spec from raw control values. Empty strings are unconstrained
    /// and unparseable numbers degrade silently to unconstrained.
    pub fn from_controls(rent: &str, rooms: &str, furnished: &str, search: &str) -> Self {
        let rooms = match rooms.trim() {
            "" => None,
            raw => raw.parse::<f64>().ok().filter(|r| !r.is_nan()),
        };
        FilterSpec {
            rent_range: RentRange::parse(rent),
            rooms,
            furnished: (!furnished.is_empty()).then(|| furnished.to_string()),
            search: search.to_lowercase(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.rent_range.is_none()
            && self.rooms.is_none()
            && self.furnished.is_none()
            && self.search.is_empty()
    }

    /// Whether one listing passes every active constraint.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(range) = &self.rent_range {
            if !range.contains(listing.rent()) {
                return false;
            }
        }
        if let Some(rooms) = self.rooms {
            if listing.rooms() != rooms {
                return false;
            }
        }
        if let Some(furnished) = &self.furnished {
            if listing.furnished() != Some(furnished.as_str()) {
                return false;
            }
        }
        if !self.search.is_empty() {
            let haystack = format!("{} {}", listing.address(), listing.short_description())
                .to_lowercase();
            if !haystack.contains(&self.search) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of listings that pass `spec`, in input order.
pub fn filtered_indices(listings: &[Listing], spec: &FilterSpec) -> Vec<usize> {
    listings
        .iter()
        .enumerate()
        .filter(|(_, l)| spec.matches(l))
        .map(|(i, _)| i)
        .collect()
}

/// Borrowed view of the listings that pass `spec`, in input order.
#[cfg_attr(not(test), allow(dead_code))]
pub fn filter<'a>(listings: &'a [Listing], spec: &FilterSpec) -> Vec<&'a Listing> {
    listings.iter().filter(|l| spec.matches(l)).collect()
}

/// Reorder a view by ascending rent, then surface. NaN sorts last; ties keep
/// their current relative order.
pub fn sort_by_rent_then_surface(listings: &[Listing], indices: &mut [usize]) {
    fn nan_last(a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.total_cmp(&b),
        }
    }
    indices.sort_by(|&a, &b| {
        let (la, lb) = (&listings[a], &listings[b]);
        nan_last(la.rent(), lb.rent()).then_with(|| nan_last(la.surface(), lb.surface()))
    });
}
