use serde_json::{Map, Value as JsonValue};

// ---------------------------------------------------------------------------
// Source schema
// ---------------------------------------------------------------------------

/// Field names of the listing source, as they appear in `data.json`.
pub mod fields {
    pub const RENT: &str = "Loyer";
    pub const ROOMS: &str = "Pièces";
    pub const SURFACE: &str = "Surface";
    pub const FURNISHED: &str = "Meublé";
    pub const ADDRESS: &str = "Adresse";
    pub const SHORT_DESCRIPTION: &str = "Description courte";
    pub const LISTING_URL: &str = "URL annonce";
    pub const SOURCE_PORTAL: &str = "Portail";
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Standard numeric coercion of a JSON value.
///
/// * number → its value
/// * string → trimmed and parsed, blank → `0`, garbage → NaN
/// * bool → `1` / `0`, null → `0`
/// * missing, array, object → NaN
pub fn coerce_number(value: Option<&JsonValue>) -> f64 {
    match value {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(JsonValue::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(JsonValue::Bool(b)) => f64::from(u8::from(*b)),
        Some(JsonValue::Null) => 0.0,
        Some(JsonValue::Array(_)) | Some(JsonValue::Object(_)) | None => f64::NAN,
    }
}

/// Render a JSON value as plain text. Missing and null render empty.
pub fn render_text(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Listing – one record of the source array
// ---------------------------------------------------------------------------

/// A single rental listing, kept as the JSON object it was loaded from so
/// that field order and untyped values survive export unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    fields: Map<String, JsonValue>,
}

impl Listing {
    pub fn from_fields(fields: Map<String, JsonValue>) -> Self {
        Listing { fields }
    }

    /// Raw field access.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    /// Field names in stored order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    pub fn rent(&self) -> f64 {
        coerce_number(self.get(fields::RENT))
    }

    pub fn rooms(&self) -> f64 {
        coerce_number(self.get(fields::ROOMS))
    }

    pub fn surface(&self) -> f64 {
        coerce_number(self.get(fields::SURFACE))
    }

    /// Furnished status; `None` unless the stored value is a string.
    pub fn furnished(&self) -> Option<&str> {
        self.get(fields::FURNISHED).and_then(JsonValue::as_str)
    }

    pub fn address(&self) -> String {
        render_text(self.get(fields::ADDRESS))
    }

    pub fn short_description(&self) -> String {
        render_text(self.get(fields::SHORT_DESCRIPTION))
    }

    pub fn listing_url(&self) -> String {
        render_text(self.get(fields::LISTING_URL))
    }

    /// Portal key; `None` when the field is absent.
    pub fn source_portal(&self) -> Option<String> {
        self.get(fields::SOURCE_PORTAL).map(|v| render_text(Some(v)))
    }
}

// ---------------------------------------------------------------------------
// ListingStore – the complete loaded collection
// ---------------------------------------------------------------------------

/// The full collection of listings for a session. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        ListingStore { listings }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Distinct room counts, ascending. NaN entries are left out.
    pub fn room_options(&self) -> Vec<f64> {
        let mut rooms: Vec<f64> = self
            .listings
            .iter()
            .map(Listing::rooms)
            .filter(|r| !r.is_nan())
            .collect();
        rooms.sort_by(f64::total_cmp);
        rooms.dedup();
        rooms
    }

    /// Distinct furnished values in first-seen order.
    pub fn furnished_options(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for value in self.listings.iter().filter_map(Listing::furnished) {
            if !out.iter().any(|v| v == value) {
                out.push(value.to_string());
            }
        }
        out
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Build a listing from a `json!` object literal.
    pub(crate) fn listing(value: JsonValue) -> Listing {
        match value {
            JsonValue::Object(map) => Listing::from_fields(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn coerces_like_standard_number_parsing() {
        assert_eq!(coerce_number(Some(&json!(1200))), 1200.0);
        assert_eq!(coerce_number(Some(&json!(" 2.5 "))), 2.5);
        assert_eq!(coerce_number(Some(&json!(""))), 0.0);
        assert_eq!(coerce_number(Some(&json!(null))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert!(coerce_number(Some(&json!("N/A"))).is_nan());
        assert!(coerce_number(Some(&json!([1]))).is_nan());
        assert!(coerce_number(None).is_nan());
    }

    #[test]
    fn accessors_read_source_schema() {
        let l = listing(json!({
            "Loyer": "1450",
            "Pièces": 2.5,
            "Surface": 55,
            "Meublé": "Non",
            "Adresse": "Rue de Carouge 12",
            "Description courte": "Lumineux",
            "URL annonce": "https://example.ch/1",
            "Portail": "Homegate.ch"
        }));
        assert_eq!(l.rent(), 1450.0);
        assert_eq!(l.rooms(), 2.5);
        assert_eq!(l.surface(), 55.0);
        assert_eq!(l.furnished(), Some("Non"));
        assert_eq!(l.address(), "Rue de Carouge 12");
        assert_eq!(l.short_description(), "Lumineux");
        assert_eq!(l.listing_url(), "https://example.ch/1");
        assert_eq!(l.source_portal().as_deref(), Some("Homegate.ch"));
    }

    #[test]
    fn non_string_furnished_is_none() {
        let l = listing(json!({ "Meublé": true }));
        assert_eq!(l.furnished(), None);
        assert_eq!(l.source_portal(), None);
        assert_eq!(l.address(), "");
    }

    #[test]
    fn field_names_keep_stored_order() {
        let l = listing(json!({ "b": 1, "a": 2, "c": 3 }));
        assert_eq!(l.field_names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn store_options_are_distinct() {
        let store = ListingStore::from_listings(vec![
            listing(json!({ "Pièces": 3, "Meublé": "Non" })),
            listing(json!({ "Pièces": 2.5, "Meublé": "Oui" })),
            listing(json!({ "Pièces": "3", "Meublé": "Non" })),
            listing(json!({ "Pièces": "?" })),
        ]);
        assert_eq!(store.room_options(), vec![2.5, 3.0]);
        assert_eq!(store.furnished_options(), vec!["Non", "Oui"]);
    }
}
