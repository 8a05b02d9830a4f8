use chrono::{NaiveDate, Utc};

use crate::color::PortalColors;
use crate::data::export::{export, DownloadSink, ExportError, ExportFormat};
use crate::data::filter::{filtered_indices, sort_by_rent_then_surface, FilterSpec};
use crate::data::model::{Listing, ListingStore};
use crate::data::stats::{summarize, Summary};

// ---------------------------------------------------------------------------
// Filter controls
// ---------------------------------------------------------------------------

/// Raw values of the filter widgets. Empty strings mean "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterControls {
    /// `min-max` rent bucket.
    pub rent: String,
    pub rooms: String,
    pub furnished: String,
    pub search: String,
}

impl FilterControls {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::from_controls(&self.rent, &self.rooms, &self.furnished, &self.search)
    }
}

/// Rent buckets offered by the rent selector, as `(value, label)`.
pub const RENT_BUCKETS: &[(&str, &str)] = &[
    ("", "Tous les loyers"),
    ("0-1200", "≤ CHF 1'200"),
    ("1200-1400", "CHF 1'200 – 1'400"),
    ("1400-1600", "CHF 1'400 – 1'600"),
    ("1600-1800", "CHF 1'600 – 1'800"),
    ("1800-100000", "≥ CHF 1'800"),
];

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// `None` until the startup load has finished, then the loaded store
    /// (possibly empty after a failed load).
    pub store: Option<ListingStore>,

    /// Current filter widget values.
    pub controls: FilterControls,

    /// Indices of listings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Order the table by rent then surface instead of store order.
    pub sort_by_rent: bool,

    /// Statistics over the full store; `None` when there is nothing to show.
    pub summary: Option<Summary>,

    /// Distinct values offered by the room and furnished selectors.
    pub room_options: Vec<f64>,
    pub furnished_options: Vec<String>,

    pub portal_colors: PortalColors,

    /// Blocking message shown until the user dismisses it.
    pub notification: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// State for an already loaded store.
    pub fn with_store(store: ListingStore) -> Self {
        let mut state = AppState::default();
        state.set_store(store);
        state
    }

    /// Ingest a freshly loaded store and derive everything from it.
    pub fn set_store(&mut self, store: ListingStore) {
        self.room_options = store.room_options();
        self.furnished_options = store.furnished_options();
        self.portal_colors = PortalColors::from_store(&store);
        self.summary = summarize(store.listings());
        self.store = Some(store);
        self.status_message = None;
        self.refilter();
    }

    /// Replace the store with one loaded from another file. Control values
    /// picked for the old store may not exist in the new one, so they reset.
    pub fn reload(&mut self, store: ListingStore) {
        self.controls = FilterControls::default();
        self.set_store(store);
    }

    /// Listings of the current view, in display order.
    pub fn visible_listings(&self) -> impl Iterator<Item = &Listing> + '_ {
        let listings = self.store.as_ref().map(ListingStore::listings).unwrap_or(&[]);
        self.visible_indices.iter().map(move |&i| &listings[i])
    }

    /// Number of listings in the store (0 before load).
    pub fn total(&self) -> usize {
        self.store.as_ref().map_or(0, ListingStore::len)
    }

    /// Recompute `visible_indices` from the current controls.
    fn refilter(&mut self) {
        let Some(store) = &self.store else {
            self.visible_indices.clear();
            return;
        };
        let spec = self.controls.to_spec();
        let mut indices = filtered_indices(store.listings(), &spec);
        if self.sort_by_rent {
            sort_by_rent_then_surface(store.listings(), &mut indices);
        }
        self.visible_indices = indices;
    }

    /// Any filter widget changed.
    pub fn on_filter_changed(&mut self) {
        self.refilter();
    }

    /// Clear every filter and show the whole store again.
    pub fn on_reset(&mut self) {
        self.controls = FilterControls::default();
        self.refilter();
    }

    pub fn on_export_csv(&mut self, sink: &mut dyn DownloadSink) {
        self.export_with(ExportFormat::Csv, Utc::now().date_naive(), sink);
    }

    pub fn on_export_json(&mut self, sink: &mut dyn DownloadSink) {
        self.export_with(ExportFormat::Json, Utc::now().date_naive(), sink);
    }

    /// Export the full store (not the filtered view).
    fn export_with(&mut self, format: ExportFormat, date: NaiveDate, sink: &mut dyn DownloadSink) {
        let listings = self.store.as_ref().map(ListingStore::listings).unwrap_or(&[]);
        match export(listings, format, date, sink) {
            Ok(Some(path)) => {
                log::info!(
                    "Exported {} listings as {format} to {}",
                    listings.len(),
                    path.display()
                );
                self.status_message = None;
            }
            Ok(None) => log::debug!("{format} export cancelled"),
            Err(ExportError::NothingToExport) => {
                self.notification = Some(ExportError::NothingToExport.to_string());
            }
            Err(e) => {
                log::error!("{format} export failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export::tests::RecordingSink;
    use crate::data::model::tests::listing;
    use serde_json::json;

    fn store() -> ListingStore {
        ListingStore::from_listings(vec![
            listing(json!({
                "Loyer": 1650, "Pièces": 3, "Surface": 68, "Meublé": "Non",
                "Adresse": "Rue de Lyon 40", "Description courte": "Traversant",
                "Portail": "Homegate.ch"
            })),
            listing(json!({
                "Loyer": 1250, "Pièces": 2, "Surface": 45, "Meublé": "Oui",
                "Adresse": "Rue des Eaux-Vives 7", "Description courte": "Proche du lac",
                "Portail": "ImmoScout24"
            })),
            listing(json!({
                "Loyer": 1250, "Pièces": 2.5, "Surface": 41, "Meublé": "Non",
                "Adresse": "Boulevard Carl-Vogt 2", "Description courte": "Refait à neuf",
                "Portail": "ImmoScout24"
            })),
        ])
    }

    #[test]
    fn loaded_store_shows_everything() {
        let state = AppState::with_store(store());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.total(), 3);
        assert_eq!(state.room_options, vec![2.0, 2.5, 3.0]);
        assert_eq!(state.furnished_options, vec!["Non", "Oui"]);
        let summary = state.summary.as_ref().unwrap();
        assert_eq!(summary.portal_count, 2);
    }

    #[test]
    fn empty_store_has_no_summary() {
        let state = AppState::with_store(ListingStore::default());
        assert!(state.summary.is_none());
        assert!(state.visible_indices.is_empty());
    }

    #[test]
    fn filter_then_reset() {
        let mut state = AppState::with_store(store());
        state.controls.furnished = "Non".into();
        state.controls.search = "CARL".into();
        state.on_filter_changed();
        assert_eq!(state.visible_indices, vec![2]);

        state.on_reset();
        assert_eq!(state.controls, FilterControls::default());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn reload_drops_controls_of_the_previous_store() {
        let mut state = AppState::with_store(store());
        state.controls.furnished = "Oui".into();
        state.controls.rooms = "2".into();
        state.on_filter_changed();
        assert_eq!(state.visible_indices, vec![1]);

        let next = ListingStore::from_listings(vec![
            listing(json!({ "Loyer": 1400, "Pièces": 4, "Meublé": "Partiellement" })),
            listing(json!({ "Loyer": 1900, "Pièces": 5, "Meublé": "Non" })),
        ]);
        state.reload(next);
        assert_eq!(state.controls, FilterControls::default());
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.furnished_options, vec!["Partiellement", "Non"]);
    }

    #[test]
    fn visible_listings_follow_the_view_order() {
        let mut state = AppState::with_store(store());
        state.sort_by_rent = true;
        state.controls.rent = "1200-1300".into();
        state.on_filter_changed();
        let addresses: Vec<String> = state.visible_listings().map(Listing::address).collect();
        assert_eq!(addresses, vec!["Boulevard Carl-Vogt 2", "Rue des Eaux-Vives 7"]);

        assert_eq!(AppState::default().visible_listings().count(), 0);
    }

    #[test]
    fn summary_ignores_the_filter() {
        let mut state = AppState::with_store(store());
        let before = state.summary.clone();
        state.controls.rent = "1200-1300".into();
        state.on_filter_changed();
        assert_eq!(state.visible_indices, vec![1, 2]);
        assert_eq!(state.summary, before);
    }

    #[test]
    fn sort_by_rent_reorders_view() {
        let mut state = AppState::with_store(store());
        state.sort_by_rent = true;
        state.on_filter_changed();
        assert_eq!(state.visible_indices, vec![2, 1, 0]);
    }

    #[test]
    fn export_uses_full_store() {
        let mut state = AppState::with_store(store());
        state.controls.furnished = "Oui".into();
        state.on_filter_changed();

        let mut sink = RecordingSink::default();
        state.on_export_json(&mut sink);
        assert_eq!(sink.payloads.len(), 1);
        let parsed: Vec<serde_json::Value> =
            serde_json::from_slice(&sink.payloads[0].bytes).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(sink.payloads[0].file_name.starts_with("annonces-export-"));
        assert!(state.notification.is_none());
    }

    #[test]
    fn export_on_empty_notifies_once_and_writes_nothing() {
        let mut state = AppState::with_store(ListingStore::default());
        let mut sink = RecordingSink::default();
        state.on_export_csv(&mut sink);
        assert!(sink.payloads.is_empty());
        assert_eq!(state.notification.take().as_deref(), Some("Aucune donnée à exporter"));
        assert!(state.notification.is_none());
    }

    #[test]
    fn export_names_file_after_date() {
        let mut state = AppState::with_store(store());
        let mut sink = RecordingSink::default();
        let date = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        state.export_with(ExportFormat::Csv, date, &mut sink);
        assert_eq!(sink.payloads[0].file_name, "annonces-export-2025-11-30.csv");
        assert_eq!(sink.payloads[0].mime, "text/csv");
    }
}
