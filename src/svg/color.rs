//! Text-form color parsing: `#rgb`, `#rrggbb`, `rgb(r,g,b)` and the
//! named-color table, in that trial order — matching
//! `musvg_parse_color_hex`/`musvg_parse_color_rgb`/
//! `musvg_parse_color_name` in the original.

use crate::svg::attrs::named_color;
use crate::svg::model::Color;

pub fn parse(text: &str) -> Option<Color> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("none") {
        return None;
    }
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex).map(Color::rgb);
    }
    if let Some(inner) = text.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        return parse_rgb_fn(inner).map(Color::rgb);
    }
    named_color(&text.to_ascii_lowercase()).map(Color::rgb)
}

fn parse_hex(hex: &str) -> Option<u32> {
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok(),
        3 => {
            let mut expanded = String::with_capacity(6);
            for c in hex.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            u32::from_str_radix(&expanded, 16).ok()
        }
        _ => None,
    }
}

fn parse_rgb_fn(inner: &str) -> Option<u32> {
    let mut channels = [0u8; 3];
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    for (i, part) in parts.iter().enumerate() {
        channels[i] = if let Some(pct) = part.strip_suffix('%') {
            let v: f32 = pct.parse().ok()?;
            (v.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8
        } else {
            part.parse::<u32>().ok()?.min(255) as u8
        };
    }
    Some(((channels[0] as u32) << 16) | ((channels[1] as u32) << 8) | channels[2] as u32)
}

pub fn to_hex_string(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xFF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse("#ff0000").map(|c| c.rgb), Some(0xff0000));
        assert_eq!(parse("#f00").map(|c| c.rgb), Some(0xff0000));
    }

    #[test]
    fn parses_rgb_function() {
        assert_eq!(parse("rgb(255, 0, 0)").map(|c| c.rgb), Some(0xff0000));
        assert_eq!(parse("rgb(100%, 0%, 0%)").map(|c| c.rgb), Some(0xff0000));
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(parse("Red").map(|c| c.rgb), Some(0xff0000));
        assert_eq!(parse("cornflowerblue").map(|c| c.rgb), Some(0x6495ed));
    }

    #[test]
    fn none_and_empty_yield_no_color() {
        assert_eq!(parse("none"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(to_hex_string(0xff0000), "#ff0000");
    }
}
