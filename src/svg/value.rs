//! Scalar attribute value parsing: lengths, opacities, viewBox,
//! preserveAspectRatio, the transform-function-list grammar, and
//! stroke-dasharray — ported from the `musvg_parse_*` family.

use crate::svg::attrs::{Align, Crop, Unit};
use crate::svg::model::{AspectRatio, DashArray, Length, Transform, TransformKind, ViewBox};
use crate::svg::path_data::Scanner;
use crate::svg::transform;

pub fn parse_float(s: &str) -> f32 {
    s.trim().parse().unwrap_or(0.0)
}

pub fn parse_opacity(s: &str) -> f32 {
    parse_float(s).clamp(0.0, 1.0)
}

pub fn parse_miterlimit(s: &str) -> f32 {
    parse_float(s).max(0.0)
}

fn number_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    i
}

/// Splits a length's numeric prefix from its unit suffix, e.g. `"12px"`
/// -> `(12.0, Px)`.
pub fn parse_length(s: &str) -> Length {
    let s = s.trim();
    let n = number_prefix_len(s);
    let value = s[..n].parse().unwrap_or(0.0);
    let units = Unit::from_suffix(s[n..].trim());
    Length { value, units }
}

pub fn parse_viewbox(s: &str) -> ViewBox {
    let vals: Vec<f32> = s
        .split(|c: char| c.is_whitespace() || c == ',' || c == '%')
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse().ok())
        .collect();
    ViewBox {
        x: *vals.first().unwrap_or(&0.0),
        y: *vals.get(1).unwrap_or(&0.0),
        width: *vals.get(2).unwrap_or(&0.0),
        height: *vals.get(3).unwrap_or(&0.0),
    }
}

fn parse_align(s: &str, is_x: bool) -> Align {
    if s == "none" {
        return Align::None;
    }
    let (min, mid) = if is_x { ("xMin", "xMid") } else { ("yMin", "yMid") };
    if s.contains(min) {
        Align::Min
    } else if s.contains(mid) {
        Align::Mid
    } else if s.contains(if is_x { "xMax" } else { "yMax" }) {
        Align::Max
    } else {
        Align::Default
    }
}

fn parse_crop(s: &str) -> Crop {
    if s.contains("meet") {
        Crop::Meet
    } else if s.contains("slice") {
        Crop::Slice
    } else {
        Crop::Default
    }
}

pub fn parse_aspectratio(s: &str) -> AspectRatio {
    AspectRatio { align_x: parse_align(s, true), align_y: parse_align(s, false), crop: parse_crop(s) }
}

pub fn parse_dasharray(s: &str) -> DashArray {
    let mut r = DashArray::default();
    if s.trim_start().starts_with('n') {
        return r; // "none"
    }
    for item in s.split(|c: char| c.is_whitespace() || c == ',') {
        if item.is_empty() {
            continue;
        }
        if (r.count as usize) < r.dashes.len() {
            r.dashes[r.count as usize] = item.parse::<f32>().unwrap_or(0.0).abs();
            r.count += 1;
        }
    }
    let sum: f32 = r.dashes[..r.count as usize].iter().sum();
    if sum <= 1e-6 {
        r.count = 0;
    }
    r
}

/// Parses a `(a, b, c ...)` argument list for one transform function,
/// returning `(args, chars consumed up to and including the closing
/// paren)`.
fn parse_transform_args(s: &str, max: usize) -> (Vec<f32>, usize) {
    let Some(open) = s.find('(') else { return (Vec::new(), s.len()) };
    let Some(close_rel) = s[open..].find(')') else { return (Vec::new(), s.len()) };
    let close = open + close_rel;
    let inner = &s[open + 1..close];
    let mut scanner = Scanner::new(inner);
    let mut args = Vec::new();
    while let Some(tok) = scanner.next_token() {
        if let crate::svg::path_data::Token::Number(v) = tok {
            if args.len() < max {
                args.push(v);
            }
        }
    }
    (args, close + 1)
}

/// Resolves a transform kind's own arguments into its affine matrix,
/// shared with the binary decoder which reads `(kind, args)` directly
/// off the wire instead of through the function-list grammar.
pub fn build_transform(kind: TransformKind, args: &[f32]) -> Transform {
    let matrix = match kind {
        TransformKind::Matrix => {
            if args.len() == 6 {
                [args[0], args[1], args[2], args[3], args[4], args[5]]
            } else {
                transform::IDENTITY
            }
        }
        TransformKind::Translate => transform::translation(args.first().copied().unwrap_or(0.0), args.get(1).copied().unwrap_or(0.0)),
        TransformKind::Scale => {
            let sx = args.first().copied().unwrap_or(1.0);
            let sy = args.get(1).copied().unwrap_or(sx);
            transform::scale(sx, sy)
        }
        TransformKind::Rotate => transform::rotation(args.first().copied().unwrap_or(0.0)),
        TransformKind::SkewX => transform::skew_x(args.first().copied().unwrap_or(0.0)),
        TransformKind::SkewY => transform::skew_y(args.first().copied().unwrap_or(0.0)),
    };
    let mut fixed = [0.0f32; 3];
    let n = args.len().min(3);
    fixed[..n].copy_from_slice(&args[..n]);
    Transform { kind, args: fixed, nargs: args.len() as u8, matrix }
}

/// Parses a `transform="..."` function-list. Multiple functions
/// compose into a single matrix-typed result; a single function keeps
/// its own kind/args so emitters can round-trip it without loss.
pub fn parse_transform_list(s: &str) -> Transform {
    let mut result: Option<Transform> = None;
    let mut rest = s;
    loop {
        let rest_trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        rest = rest_trimmed;
        let kind = if rest.starts_with("matrix") {
            TransformKind::Matrix
        } else if rest.starts_with("translate") {
            TransformKind::Translate
        } else if rest.starts_with("scale") {
            TransformKind::Scale
        } else if rest.starts_with("rotate") {
            TransformKind::Rotate
        } else if rest.starts_with("skewX") {
            TransformKind::SkewX
        } else if rest.starts_with("skewY") {
            TransformKind::SkewY
        } else if rest.is_empty() {
            break;
        } else {
            rest = &rest[1..];
            continue;
        };
        let (args, consumed) = parse_transform_args(rest, l_max(kind));
        let next = build_transform(kind, &args);
        result = Some(match result {
            None => next,
            Some(prev) => {
                let mut combined = prev;
                combined.kind = TransformKind::Matrix;
                transform::premultiply(&mut combined.matrix, &next.matrix);
                combined
            }
        });
        if consumed == 0 || consumed > rest.len() {
            break;
        }
        rest = &rest[consumed..];
    }
    result.unwrap_or_default()
}

fn l_max(kind: TransformKind) -> usize {
    match kind {
        TransformKind::Matrix => 6,
        TransformKind::Translate | TransformKind::Scale => 2,
        TransformKind::Rotate => 3,
        TransformKind::SkewX | TransformKind::SkewY => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_length_with_unit_suffix() {
        let l = parse_length("12.5px");
        assert_eq!(l.value, 12.5);
        assert_eq!(l.units, Unit::Px);
    }

    #[test]
    fn parses_viewbox_numbers() {
        let vb = parse_viewbox("0 0 100 200");
        assert_eq!(vb, ViewBox { x: 0.0, y: 0.0, width: 100.0, height: 200.0 });
    }

    #[test]
    fn parses_single_translate_transform() {
        let t = parse_transform_list("translate(10 20)");
        assert_eq!(t.kind, TransformKind::Translate);
        assert_eq!(t.matrix, transform::translation(10.0, 20.0));
    }

    #[test]
    fn composes_multiple_transform_functions_into_matrix() {
        let t = parse_transform_list("translate(10 0) scale(2 2)");
        assert_eq!(t.kind, TransformKind::Matrix);
    }

    #[test]
    fn dasharray_of_all_zero_collapses_to_none() {
        let d = parse_dasharray("0,0,0");
        assert_eq!(d.count, 0);
    }

    #[test]
    fn aspectratio_parses_align_and_crop() {
        let ar = parse_aspectratio("xMidYMid slice");
        assert_eq!(ar.align_x, Align::Mid);
        assert_eq!(ar.align_y, Align::Mid);
        assert_eq!(ar.crop, Crop::Slice);
    }
}
