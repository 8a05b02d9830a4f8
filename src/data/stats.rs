use serde_json::Value as JsonValue;

use super::model::{fields, Listing};

/// Aggregate figures over a collection of listings.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Mean rent, rounded to the nearest unit.
    pub average_rent: f64,
    /// Mean surface, rounded to one decimal.
    pub average_surface: f64,
    /// Lowest rent per surface unit, rounded to one decimal. `None` when no
    /// listing has a finite ratio (e.g. every surface is zero).
    pub best_deal: Option<f64>,
    /// Number of distinct source portals.
    pub portal_count: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    sum / n as f64
}

/// Summarise `listings`, or `None` when there is nothing to summarise.
///
/// Non-numeric rents or surfaces make the matching average NaN. Ratios that
/// are not finite (zero surface, NaN inputs) are skipped for the best deal.
pub fn summarize<'a, I>(listings: I) -> Option<Summary>
where
    I: IntoIterator<Item = &'a Listing>,
    I::IntoIter: Clone,
{
    let listings = listings.into_iter();
    if listings.clone().next().is_none() {
        return None;
    }

    let average_rent = round_to(mean(listings.clone().map(Listing::rent)), 0);
    let average_surface = round_to(mean(listings.clone().map(Listing::surface)), 1);

    let best_deal = listings
        .clone()
        .map(|l| l.rent() / l.surface())
        .filter(|ratio| ratio.is_finite())
        .min_by(f64::total_cmp)
        .map(|ratio| round_to(ratio, 1));

    // Raw values: `1` and `"1"` differ, and so do `null`, `""` and a missing field.
    let mut portals: Vec<Option<&JsonValue>> = Vec::new();
    for portal in listings.map(|l| l.get(fields::SOURCE_PORTAL)) {
        if !portals.contains(&portal) {
            portals.push(portal);
        }
    }
    let portal_count = portals.len();

    Some(Summary {
        average_rent,
        average_surface,
        best_deal,
        portal_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use serde_json::json;

    #[test]
    fn empty_has_no_statistics() {
        let listings: Vec<Listing> = Vec::new();
        assert_eq!(summarize(&listings), None);
    }

    #[test]
    fn averages_and_best_deal() {
        let listings = vec![
            listing(json!({ "Loyer": 1000, "Surface": 50, "Portail": "A" })),
            listing(json!({ "Loyer": 2000, "Surface": 100, "Portail": "A" })),
        ];
        let summary = summarize(&listings).unwrap();
        assert_eq!(summary.average_rent, 1500.0);
        assert_eq!(summary.average_surface, 75.0);
        assert_eq!(summary.best_deal, Some(20.0));
        assert_eq!(summary.portal_count, 1);
    }

    #[test]
    fn rounds_rent_to_integer_and_surface_to_one_decimal() {
        let listings = vec![
            listing(json!({ "Loyer": 1001, "Surface": 33 })),
            listing(json!({ "Loyer": 1002, "Surface": 34 })),
            listing(json!({ "Loyer": 1002, "Surface": 34 })),
        ];
        let summary = summarize(&listings).unwrap();
        assert_eq!(summary.average_rent, 1002.0);
        assert_eq!(summary.average_surface, 33.7);
        assert_eq!(summary.best_deal, Some(29.5));
    }

    #[test]
    fn zero_surface_is_skipped_for_best_deal() {
        let listings = vec![
            listing(json!({ "Loyer": 1200, "Surface": 0 })),
            listing(json!({ "Loyer": 1500, "Surface": 60 })),
        ];
        assert_eq!(summarize(&listings).unwrap().best_deal, Some(25.0));

        let only_zero = vec![listing(json!({ "Loyer": 1200, "Surface": 0 }))];
        assert_eq!(summarize(&only_zero).unwrap().best_deal, None);
    }

    #[test]
    fn non_numeric_rent_makes_average_nan() {
        let listings = vec![
            listing(json!({ "Loyer": "sur demande", "Surface": 40 })),
            listing(json!({ "Loyer": 1000, "Surface": 40 })),
        ];
        let summary = summarize(&listings).unwrap();
        assert!(summary.average_rent.is_nan());
        assert_eq!(summary.average_surface, 40.0);
        assert_eq!(summary.best_deal, Some(25.0));
    }

    #[test]
    fn counts_distinct_portals() {
        let listings = vec![
            listing(json!({ "Portail": "ImmoScout24" })),
            listing(json!({ "Portail": "Homegate.ch" })),
            listing(json!({ "Portail": "ImmoScout24" })),
            listing(json!({})),
        ];
        assert_eq!(summarize(&listings).unwrap().portal_count, 3);
    }

    #[test]
    fn portals_are_told_apart_by_raw_value() {
        let listings = vec![
            listing(json!({ "Portail": null })),
            listing(json!({ "Portail": "" })),
            listing(json!({ "Portail": 1 })),
            listing(json!({ "Portail": "1" })),
            listing(json!({})),
            listing(json!({ "Portail": "1" })),
            listing(json!({ "Portail": null })),
        ];
        assert_eq!(summarize(&listings).unwrap().portal_count, 5);
    }
}
