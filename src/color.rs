use std::collections::HashMap;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Hex helpers
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`).
pub fn parse_hex(s: &str) -> Option<Srgb<u8>> {
    s.parse::<Srgb<u8>>().ok()
}

pub fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

/// Neutral colour for values that have no mapping.
pub const FALLBACK: &str = "#808080";

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_hex(rgb.into_format())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Named sequences
// ---------------------------------------------------------------------------

/// Qualitative "Prism" sequence.
pub const PRISM: &[&str] = &[
    "#5f4690", "#1d6996", "#38a6a5", "#0f8554", "#73af48", "#edad08", "#e17c05", "#cc503e",
    "#94346e", "#6f4070", "#666666",
];

/// Sequential "Plasma", used both as a discrete sequence and a scale.
pub const PLASMA: &[&str] = &[
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

const AGGRNYL: &[&str] = &[
    "#245668", "#0f7279", "#0d8f81", "#39ab7e", "#6ec574", "#a9dc67", "#edef5d",
];

const RDBU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];

// ---------------------------------------------------------------------------
// Continuous scales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuousScale {
    Aggrnyl,
    RdBu,
    Plasma,
}

impl ContinuousScale {
    pub fn stops(self) -> &'static [&'static str] {
        match self {
            ContinuousScale::Aggrnyl => AGGRNYL,
            ContinuousScale::RdBu => RDBU,
            ContinuousScale::Plasma => PLASMA,
        }
    }

    /// Colour at position `t` in `[0, 1]` (clamped), interpolated in linear RGB.
    pub fn sample(self, t: f64) -> String {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = (pos - i as f64) as f32;

        let (Some(a), Some(b)) = (parse_hex(stops[i]), parse_hex(stops[i + 1])) else {
            return FALLBACK.to_string();
        };
        let a: LinSrgb = a.into_format::<f32>().into_linear();
        let b: LinSrgb = b.into_format::<f32>().into_linear();
        let mixed = a.mix(b, frac);
        to_hex(Srgb::<f32>::from_linear(mixed).into_format::<u8>())
    }
}

// ---------------------------------------------------------------------------
// Discrete mapping: category → colour
// ---------------------------------------------------------------------------

/// Maps category values to colours, assigned in first-seen order from a
/// sequence (cycling when it runs out).
#[derive(Debug, Clone)]
pub struct DiscreteColors {
    mapping: HashMap<String, String>,
}

impl DiscreteColors {
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a str>, sequence: &[&str]) -> Self {
        let mut mapping = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for cat in categories {
            if !order.iter().any(|seen| seen == cat) {
                order.push(cat.to_string());
            }
        }
        let generated;
        let seq: Vec<&str> = if sequence.is_empty() {
            generated = generate_palette(order.len());
            generated.iter().map(String::as_str).collect()
        } else {
            sequence.to_vec()
        };
        for (i, cat) in order.iter().enumerate() {
            let color = seq.get(i % seq.len().max(1)).copied().unwrap_or(FALLBACK);
            mapping.insert(cat.clone(), color.to_string());
        }
        DiscreteColors { mapping }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, category: &str) -> &str {
        self.mapping
            .get(category)
            .map(String::as_str)
            .unwrap_or(FALLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = parse_hex("#ff6347").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 99, 71));
        assert_eq!(to_hex(c), "#ff6347");
        assert!(parse_hex("tomato").is_none());
    }

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(ContinuousScale::RdBu.sample(0.0), "#67001f");
        assert_eq!(ContinuousScale::RdBu.sample(1.0), "#053061");
        assert_eq!(ContinuousScale::Aggrnyl.sample(-3.0), "#245668");
        assert_eq!(ContinuousScale::Aggrnyl.sample(f64::NAN), "#245668");
        assert_eq!(ContinuousScale::RdBu.sample(0.5), "#f7f7f7");
    }

    #[test]
    fn test_sample_between_stops_blends_neighbours() {
        // halfway between #67001f and #b2182b
        let c = parse_hex(&ContinuousScale::RdBu.sample(0.05)).unwrap();
        assert!(c.red > 0x67 && c.red < 0xb2, "{c:?}");
        assert!(c.green > 0x00 && c.green < 0x18, "{c:?}");
        assert!(c.blue > 0x1f && c.blue < 0x2b, "{c:?}");
    }

    #[test]
    fn test_discrete_colors_first_seen_order_and_cycle() {
        let cats = ["b", "a", "b", "c"];
        let map = DiscreteColors::new(cats, &["#000001", "#000002"]);
        assert_eq!(map.color_for("b"), "#000001");
        assert_eq!(map.color_for("a"), "#000002");
        assert_eq!(map.color_for("c"), "#000001");
        assert_eq!(map.color_for("zzz"), FALLBACK);
    }

    #[test]
    fn test_generate_palette_len() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert!(p.iter().all(|c| parse_hex(c).is_some()));
    }
}
