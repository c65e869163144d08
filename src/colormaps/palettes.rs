//! Named palette registry.
//!
//! Continuous palettes come straight from `colorgrad`'s ColorBrewer and
//! matplotlib presets; qualitative ColorBrewer sets are carried as discrete
//! color lists. Lookup is case-insensitive and returns the canonical name.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use super::scale::ColorScale;

/// How a registered palette is materialized
enum PaletteKind {
    /// A `colorgrad` preset gradient
    Preset(fn() -> colorgrad::Gradient),
    /// A fixed qualitative color list
    Qualitative(&'static [[u8; 4]]),
}

struct Palette {
    name: &'static str,
    kind: PaletteKind,
}

// ColorBrewer qualitative sets (colorbrewer2.org)
const SET1: [[u8; 4]; 9] = [
    [0xe4, 0x1a, 0x1c, 255],
    [0x37, 0x7e, 0xb8, 255],
    [0x4d, 0xaf, 0x4a, 255],
    [0x98, 0x4e, 0xa3, 255],
    [0xff, 0x7f, 0x00, 255],
    [0xff, 0xff, 0x33, 255],
    [0xa6, 0x56, 0x28, 255],
    [0xf7, 0x81, 0xbf, 255],
    [0x99, 0x99, 0x99, 255],
];

const SET2: [[u8; 4]; 8] = [
    [0x66, 0xc2, 0xa5, 255],
    [0xfc, 0x8d, 0x62, 255],
    [0x8d, 0xa0, 0xcb, 255],
    [0xe7, 0x8a, 0xc3, 255],
    [0xa6, 0xd8, 0x54, 255],
    [0xff, 0xd9, 0x2f, 255],
    [0xe5, 0xc4, 0x94, 255],
    [0xb3, 0xb3, 0xb3, 255],
];

const SET3: [[u8; 4]; 12] = [
    [0x8d, 0xd3, 0xc7, 255],
    [0xff, 0xff, 0xb3, 255],
    [0xbe, 0xba, 0xda, 255],
    [0xfb, 0x80, 0x72, 255],
    [0x80, 0xb1, 0xd3, 255],
    [0xfd, 0xb4, 0x62, 255],
    [0xb3, 0xde, 0x69, 255],
    [0xfc, 0xcd, 0xe5, 255],
    [0xd9, 0xd9, 0xd9, 255],
    [0xbc, 0x80, 0xbd, 255],
    [0xcc, 0xeb, 0xc5, 255],
    [0xff, 0xed, 0x6f, 255],
];

const PAIRED: [[u8; 4]; 12] = [
    [0xa6, 0xce, 0xe3, 255],
    [0x1f, 0x78, 0xb4, 255],
    [0xb2, 0xdf, 0x8a, 255],
    [0x33, 0xa0, 0x2c, 255],
    [0xfb, 0x9a, 0x99, 255],
    [0xe3, 0x1a, 0x1c, 255],
    [0xfd, 0xbf, 0x6f, 255],
    [0xff, 0x7f, 0x00, 255],
    [0xca, 0xb2, 0xd6, 255],
    [0x6a, 0x3d, 0x9a, 255],
    [0xff, 0xff, 0x99, 255],
    [0xb1, 0x59, 0x28, 255],
];

/// Registry keyed by lowercase name
static REGISTRY: Lazy<BTreeMap<String, Palette>> = Lazy::new(|| {
    let palettes: Vec<Palette> = vec![
        // Sequential, single and multi hue
        preset("Blues", colorgrad::blues),
        preset("Greens", colorgrad::greens),
        preset("Greys", colorgrad::greys),
        preset("Oranges", colorgrad::oranges),
        preset("Purples", colorgrad::purples),
        preset("Reds", colorgrad::reds),
        preset("BuGn", colorgrad::bu_gn),
        preset("BuPu", colorgrad::bu_pu),
        preset("GnBu", colorgrad::gn_bu),
        preset("OrRd", colorgrad::or_rd),
        preset("PuBu", colorgrad::pu_bu),
        preset("PuRd", colorgrad::pu_rd),
        preset("RdPu", colorgrad::rd_pu),
        preset("YlGn", colorgrad::yl_gn),
        preset("YlGnBu", colorgrad::yl_gn_bu),
        preset("YlOrRd", colorgrad::yl_or_rd),
        preset("Viridis", colorgrad::viridis),
        preset("Plasma", colorgrad::plasma),
        preset("Inferno", colorgrad::inferno),
        preset("Magma", colorgrad::magma),
        preset("Turbo", colorgrad::turbo),
        // Diverging
        preset("RdBu", colorgrad::rd_bu),
        preset("RdGy", colorgrad::rd_gy),
        preset("RdYlBu", colorgrad::rd_yl_bu),
        preset("RdYlGn", colorgrad::rd_yl_gn),
        preset("Spectral", colorgrad::spectral),
        preset("BrBG", colorgrad::br_bg),
        preset("PiYG", colorgrad::pi_yg),
        preset("PRGn", colorgrad::pr_gn),
        preset("PuOr", colorgrad::pu_or),
        // Qualitative
        qualitative("Set1", &SET1),
        qualitative("Set2", &SET2),
        qualitative("Set3", &SET3),
        qualitative("Paired", &PAIRED),
    ];

    palettes
        .into_iter()
        .map(|p| (p.name.to_lowercase(), p))
        .collect()
});

fn preset(name: &'static str, builder: fn() -> colorgrad::Gradient) -> Palette {
    Palette {
        name,
        kind: PaletteKind::Preset(builder),
    }
}

fn qualitative(name: &'static str, colors: &'static [[u8; 4]]) -> Palette {
    Palette {
        name,
        kind: PaletteKind::Qualitative(colors),
    }
}

/// Resolve a palette name (case-insensitive) to its canonical name and scale
pub fn named_palette(name: &str) -> Option<(&'static str, ColorScale)> {
    let palette = REGISTRY.get(&name.trim().to_lowercase())?;
    let scale = match &palette.kind {
        PaletteKind::Preset(builder) => ColorScale::Continuous(builder()),
        PaletteKind::Qualitative(colors) => ColorScale::Discrete(colors.to_vec()),
    };
    Some((palette.name, scale))
}

/// Canonical names of all registered palettes, alphabetically
pub fn palette_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.values().map(|p| p.name).collect();
    names.sort_unstable_by_key(|n| n.to_lowercase());
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(named_palette("Blues").is_some());
        assert!(named_palette("blues").is_some());
        assert!(named_palette("BLUES").is_some());
        assert!(named_palette(" rdbu ").is_some());
        assert!(named_palette("bogus").is_none());
    }

    #[test]
    fn test_lookup_returns_canonical_name() {
        let (name, _) = named_palette("rdylbu").unwrap();
        assert_eq!(name, "RdYlBu");
    }

    #[test]
    fn test_qualitative_palettes_are_discrete() {
        let (_, scale) = named_palette("Set3").unwrap();
        assert!(scale.is_discrete());
        let (_, scale) = named_palette("Blues").unwrap();
        assert!(!scale.is_discrete());
    }

    #[test]
    fn test_set3_first_color() {
        let (_, scale) = named_palette("Set3").unwrap();
        assert_eq!(scale.color_at(0.0), [0x8d, 0xd3, 0xc7, 255]);
    }

    #[test]
    fn test_palette_names_sorted_and_complete() {
        let names = palette_names();
        assert!(names.contains(&"Blues"));
        assert!(names.contains(&"RdBu"));
        assert!(names.contains(&"Set3"));
        let mut sorted = names.clone();
        sorted.sort_unstable_by_key(|n| n.to_lowercase());
        assert_eq!(names, sorted);
    }
}
