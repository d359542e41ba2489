//! Named colormaps for field rasterization.
//!
//! Each map is a table of evenly spaced RGB stops sampled with linear
//! interpolation. The `_r` variants reuse the base table and flip the
//! sampling direction.

use crate::canvas::Color;

/// Colormap names offered by the dashboard, in display order.
pub const COLORMAP_NAMES: [&str; 8] = [
    "viridis",
    "inferno",
    "inferno_r",
    "kb",
    "coolwarm",
    "coolwarm_r",
    "Blues",
    "Blues_r",
];

const VIRIDIS: &[(u8, u8, u8)] = &[
    (68, 1, 84),
    (72, 40, 120),
    (62, 74, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (109, 205, 89),
    (180, 222, 44),
    (253, 231, 37),
];

const INFERNO: &[(u8, u8, u8)] = &[
    (0, 0, 4),
    (31, 12, 72),
    (85, 15, 109),
    (136, 34, 106),
    (186, 54, 85),
    (227, 89, 51),
    (249, 140, 10),
    (249, 201, 50),
    (252, 255, 164),
];

// Black-to-blue ramp in the style of the kb map shipped with colorcet.
const KB: &[(u8, u8, u8)] = &[
    (0, 0, 0),
    (14, 5, 60),
    (25, 10, 120),
    (35, 18, 181),
    (46, 30, 235),
    (83, 86, 243),
    (120, 140, 248),
    (158, 193, 252),
    (195, 240, 255),
];

const COOLWARM: &[(u8, u8, u8)] = &[
    (59, 76, 192),
    (98, 130, 234),
    (141, 176, 254),
    (184, 208, 249),
    (221, 221, 221),
    (245, 196, 173),
    (244, 154, 123),
    (222, 96, 77),
    (180, 4, 38),
];

const BLUES: &[(u8, u8, u8)] = &[
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

/// A resolved colormap ready for sampling.
#[derive(Debug, Clone, Copy)]
pub struct Colormap {
    name: &'static str,
    stops: &'static [(u8, u8, u8)],
    reversed: bool,
}

impl Colormap {
    /// Looks up a colormap by its display name.
    pub fn by_name(name: &str) -> Option<Self> {
        let (canonical, stops, reversed) = match name {
            "viridis" => ("viridis", VIRIDIS, false),
            "inferno" => ("inferno", INFERNO, false),
            "inferno_r" => ("inferno_r", INFERNO, true),
            "kb" => ("kb", KB, false),
            "coolwarm" => ("coolwarm", COOLWARM, false),
            "coolwarm_r" => ("coolwarm_r", COOLWARM, true),
            "Blues" => ("Blues", BLUES, false),
            "Blues_r" => ("Blues_r", BLUES, true),
            _ => return None,
        };
        Some(Self {
            name: canonical,
            stops,
            reversed,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Samples the map at `t` in `[0, 1]`. Out-of-range values clamp.
    pub fn sample(&self, t: f32) -> Color {
        let mut t = t.clamp(0.0, 1.0);
        if self.reversed {
            t = 1.0 - t;
        }
        let last = self.stops.len() - 1;
        let scaled = t * last as f32;
        let lower = (scaled.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let frac = scaled - lower as f32;

        let (r1, g1, b1) = self.stops[lower];
        let (r2, g2, b2) = self.stops[upper];
        Color {
            r: (r1 as f32 + (r2 as f32 - r1 as f32) * frac) as u8,
            g: (g1 as f32 + (g2 as f32 - g1 as f32) * frac) as u8,
            b: (b1 as f32 + (b2 as f32 - b1 as f32) * frac) as u8,
            a: 255,
        }
    }
}

/// All names accepted by [`Colormap::by_name`], in display order.
pub fn colormap_names() -> &'static [&'static str] {
    &COLORMAP_NAMES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_offered_name_resolves() {
        for name in colormap_names() {
            let cmap = Colormap::by_name(name);
            assert!(cmap.is_some(), "{} did not resolve", name);
            assert_eq!(cmap.unwrap().name(), *name);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!(Colormap::by_name("magma").is_none());
        assert!(Colormap::by_name("").is_none());
        assert!(Colormap::by_name("VIRIDIS").is_none());
    }

    #[test]
    fn test_viridis_endpoints() {
        let cmap = Colormap::by_name("viridis").unwrap();
        let low = cmap.sample(0.0);
        let high = cmap.sample(1.0);
        assert_eq!((low.r, low.g, low.b, low.a), (68, 1, 84, 255));
        assert_eq!((high.r, high.g, high.b, high.a), (253, 231, 37, 255));
    }

    #[test]
    fn test_reversed_variant_flips_sampling() {
        let forward = Colormap::by_name("inferno").unwrap();
        let reversed = Colormap::by_name("inferno_r").unwrap();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let a = forward.sample(t);
            let b = reversed.sample(1.0 - t);
            assert_eq!((a.r, a.g, a.b), (b.r, b.g, b.b));
        }
    }

    #[test]
    fn test_out_of_range_samples_clamp() {
        let cmap = Colormap::by_name("Blues").unwrap();
        let below = cmap.sample(-3.0);
        let zero = cmap.sample(0.0);
        assert_eq!((below.r, below.g, below.b), (zero.r, zero.g, zero.b));

        let above = cmap.sample(42.0);
        let one = cmap.sample(1.0);
        assert_eq!((above.r, above.g, above.b), (one.r, one.g, one.b));
    }

    #[test]
    fn test_coolwarm_midpoint_is_neutral() {
        let cmap = Colormap::by_name("coolwarm").unwrap();
        let mid = cmap.sample(0.5);
        assert_eq!((mid.r, mid.g, mid.b), (221, 221, 221));
    }
}
