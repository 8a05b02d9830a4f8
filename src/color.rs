use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ListingStore;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.70, 0.50).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Portal colours
// ---------------------------------------------------------------------------

/// One colour per source portal, shared by the table and the plot.
#[derive(Debug, Clone, Default)]
pub struct PortalColors {
    mapping: BTreeMap<String, Color32>,
}

impl PortalColors {
    pub fn from_store(store: &ListingStore) -> Self {
        let portals: BTreeSet<String> = store
            .listings()
            .iter()
            .filter_map(|l| l.source_portal())
            .collect();
        let palette = generate_palette(portals.len());
        PortalColors {
            mapping: portals.into_iter().zip(palette).collect(),
        }
    }

    /// Colour for a portal; grey for unknown or missing portals.
    pub fn color_for(&self, portal: Option<&str>) -> Color32 {
        portal
            .and_then(|p| self.mapping.get(p))
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    /// `(portal, colour)` pairs in name order, for legends.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Color32)> {
        self.mapping.iter().map(|(p, c)| (p.as_str(), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use serde_json::json;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn one_colour_per_portal() {
        let store = ListingStore::from_listings(vec![
            listing(json!({ "Portail": "Homegate.ch" })),
            listing(json!({ "Portail": "ImmoScout24" })),
            listing(json!({ "Portail": "Homegate.ch" })),
            listing(json!({})),
        ]);
        let colors = PortalColors::from_store(&store);
        let names: Vec<&str> = colors.entries().map(|(p, _)| p).collect();
        assert_eq!(names, vec!["Homegate.ch", "ImmoScout24"]);
        assert_eq!(colors.color_for(None), Color32::GRAY);
        assert_ne!(colors.color_for(Some("Homegate.ch")), Color32::GRAY);
    }
}
