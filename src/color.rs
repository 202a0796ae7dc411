use std::sync::LazyLock;

use regex::Regex;

pub const WHITE: &str = "#ffffff";
pub const BLACK: &str = "#000000";

const DARK_LUMINANCE: f64 = 0.5;
const VERY_DARK_LUMINANCE: f64 = 0.08;
const NOTE_ADJUSTMENT: i32 = 50;

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(?:\d*\.)?\d+%?\s*)?\)$",
    )
    .expect("static rgb() pattern compiles")
});

const NAMED_COLORS: [(&str, &str); 24] = [
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("lime", "#00ff00"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("olive", "#808000"),
    ("maroon", "#800000"),
    ("silver", "#c0c0c0"),
    ("gold", "#ffd700"),
    ("indigo", "#4b0082"),
    ("violet", "#ee82ee"),
    ("coral", "#ff7f50"),
];

pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_owned(),
        _ => return None,
    };

    let channel = |offset: usize| u8::from_str_radix(&expanded[offset..offset + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// Unparseable colors count as black.
pub fn luminance(hex: &str) -> f64 {
    let Some([r, g, b]) = parse_hex(hex) else {
        return 0.0;
    };

    let value = 0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b);
    value.clamp(0.0, 1.0)
}

pub fn is_dark(hex: &str) -> bool {
    luminance(hex) < DARK_LUMINANCE
}

pub fn adjust_brightness(hex: &str, delta: i32) -> String {
    let Some(rgb) = parse_hex(hex) else {
        return hex.to_owned();
    };

    let shifted = rgb.map(|channel| (channel as i32 + delta).clamp(0, 255) as u8);
    to_hex(shifted)
}

pub fn derive_note_color(period_color: Option<&str>, fallback: &str) -> String {
    match period_color {
        None => fallback.to_owned(),
        Some(color) if is_dark(color) => adjust_brightness(color, NOTE_ADJUSTMENT),
        Some(color) => adjust_brightness(color, -NOTE_ADJUSTMENT),
    }
}

fn contrast_ratio(a: f64, b: f64) -> f64 {
    let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
    (lighter + 0.05) / (darker + 0.05)
}

pub fn pick_contrasting_text_color(background: &str) -> &'static str {
    let lum = luminance(background);
    if lum < VERY_DARK_LUMINANCE {
        return WHITE;
    }

    if contrast_ratio(lum, 1.0) >= contrast_ratio(lum, 0.0) {
        WHITE
    } else {
        BLACK
    }
}

pub fn normalize_to_hex(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(rgb) = parse_hex(trimmed) {
        return to_hex(rgb);
    }

    let lowered = trimmed.to_ascii_lowercase();
    if let Some(captures) = RGB_FUNCTION.captures(&lowered) {
        let channel = |index: usize| {
            captures[index]
                .parse::<u16>()
                .map(|value| value.min(255) as u8)
                .unwrap_or(0)
        };
        return to_hex([channel(1), channel(2), channel(3)]);
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, hex)| (*hex).to_owned())
        .unwrap_or_else(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn luminance_spans_black_to_white() {
        assert_relative_eq!(luminance("#000000"), 0.0);
        assert_relative_eq!(luminance("#ffffff"), 1.0, epsilon = 1e-9);
        assert_relative_eq!(luminance("#fff"), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn luminance_stays_in_unit_range() {
        for hex in ["#123456", "#abcdef", "#ff0000", "#00ff00", "#0000ff", "#7f7f7f"] {
            let value = luminance(hex);
            assert!((0.0..=1.0).contains(&value), "{hex} -> {value}");
        }
        assert!(luminance("#00ff00") > luminance("#ff0000"));
        assert!(luminance("#ff0000") > luminance("#0000ff"));
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(parse_hex("#abc"), Some([0xaa, 0xbb, 0xcc]));
        assert_eq!(parse_hex("#ABCDEF"), Some([0xab, 0xcd, 0xef]));
        assert_eq!(parse_hex("abcdef"), None);
        assert_eq!(parse_hex("#abcd"), None);
        assert_eq!(parse_hex("#ggg"), None);
    }

    #[test]
    fn brightness_clamps_per_channel() {
        assert_eq!(adjust_brightness("#f0f0f0", 50), "#ffffff");
        assert_eq!(adjust_brightness("#102030", -40), "#000008");
        assert_eq!(adjust_brightness("#101820", -40), "#000000");
        assert_eq!(adjust_brightness("#102030", 16), "#203040");
        assert_eq!(adjust_brightness("tomato", 16), "tomato");
    }

    #[test]
    fn note_color_moves_away_from_period_background() {
        assert_eq!(derive_note_color(None, "#6fa8dc"), "#6fa8dc");

        for period in ["#101820", "#1e3a5f", "#333333", "#202020"] {
            let note = derive_note_color(Some(period), "#6fa8dc");
            assert!(luminance(&note) > luminance(period), "{period} -> {note}");
        }

        for period in ["#f0e68c", "#ffffff", "#cccccc", "#aaddff"] {
            let note = derive_note_color(Some(period), "#6fa8dc");
            assert!(luminance(&note) < luminance(period), "{period} -> {note}");
        }
    }

    #[test]
    fn contrasting_text_prefers_readable_side() {
        assert_eq!(pick_contrasting_text_color("#000000"), WHITE);
        assert_eq!(pick_contrasting_text_color("#101010"), WHITE);
        assert_eq!(pick_contrasting_text_color("#ffffff"), BLACK);
        assert_eq!(pick_contrasting_text_color("#ffd700"), BLACK);
        assert_eq!(pick_contrasting_text_color("#0000ff"), WHITE);
        assert_eq!(pick_contrasting_text_color("not-a-color"), WHITE);
    }

    #[test]
    fn normalizes_supported_syntaxes() {
        assert_eq!(normalize_to_hex("#ABC"), "#aabbcc");
        assert_eq!(normalize_to_hex(" #AaBbCc "), "#aabbcc");
        assert_eq!(normalize_to_hex("rgb(255, 0, 128)"), "#ff0080");
        assert_eq!(normalize_to_hex("rgba(10,20,30,0.5)"), "#0a141e");
        assert_eq!(normalize_to_hex("RGB(300, 0, 0)"), "#ff0000");
        assert_eq!(normalize_to_hex("Gold"), "#ffd700");
        assert_eq!(normalize_to_hex("var(--accent)"), "var(--accent)");
    }
}
