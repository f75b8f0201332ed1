//! Text-form rendering of attribute values, shared by the XML emitter
//! and the indented debug-text emitter. Mirrors the `musvg_write_text_*`
//! family, but leans on Rust's own shortest round-trip float formatting
//! rather than reproducing `%.8g` exactly.

use crate::svg::attrs::Attr;
use crate::svg::color;
use crate::svg::model::*;

pub fn fmt_num(v: f32) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

fn fmt_length(l: Length) -> String {
    format!("{}{}", fmt_num(l.value), l.units.name())
}

fn fmt_color(c: Color) -> String {
    if c.present {
        color::to_hex_string(c.rgb)
    } else {
        "none".to_string()
    }
}

fn fmt_transform(t: &Transform) -> String {
    use crate::svg::model::TransformKind::*;
    let name = match t.kind {
        Matrix => "matrix",
        Translate => "translate",
        Scale => "scale",
        Rotate => "rotate",
        SkewX => "skewX",
        SkewY => "skewY",
    };
    let args: Vec<String> = if t.kind == Matrix {
        t.matrix.iter().map(|v| fmt_num(*v)).collect()
    } else {
        t.args[..t.nargs as usize].iter().map(|v| fmt_num(*v)).collect()
    };
    format!("{}({})", name, args.join(","))
}

fn fmt_dasharray(d: &DashArray) -> String {
    d.dashes[..d.count as usize].iter().map(|v| fmt_num(*v)).collect::<Vec<_>>().join(",")
}

fn fmt_viewbox(v: &ViewBox) -> String {
    format!("{} {} {} {}", fmt_num(v.x), fmt_num(v.y), fmt_num(v.width), fmt_num(v.height))
}

fn fmt_aspectratio(a: &AspectRatio) -> String {
    use crate::svg::attrs::{Align, Crop};
    let x = match a.align_x {
        Align::None => "none",
        Align::Min => "xMin",
        Align::Mid => "xMid",
        Align::Max => "xMax",
        Align::Default => "xMid",
    };
    let y = match a.align_y {
        Align::None => "",
        Align::Min => "YMin",
        Align::Mid => "YMid",
        Align::Max => "YMax",
        Align::Default => "YMid",
    };
    let crop = match a.crop {
        Crop::Slice => "slice",
        _ => "meet",
    };
    if a.align_x == Align::None {
        "none".to_string()
    } else {
        format!("{}{} {}", x, y, crop)
    }
}

fn fmt_path_d(doc: &Document, p: &PathPayload) -> String {
    let ops = &doc.path_ops[p.op_offset as usize..(p.op_offset + p.op_count) as usize];
    let mut out = String::new();
    for op in ops {
        out.push(op.code.cmd_char());
        let args = doc.floats(op.point_offset, op.point_count);
        for (i, v) in args.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&fmt_num(*v));
        }
        out.push(' ');
    }
    out.trim_end().to_string()
}

fn fmt_points(doc: &Document, offset: u32, count: u32) -> String {
    doc.floats(offset, count).chunks(2).map(|xy| format!("{},{}", fmt_num(xy[0]), xy.get(1).map(|y| fmt_num(*y)).unwrap_or_default())).collect::<Vec<_>>().join(" ")
}

/// Every attribute set on `node`, in enum declaration order — the same
/// order the original walks its presence bitmap with `next_attr`.
pub fn present_attrs(node: &Node) -> Vec<Attr> {
    const ALL: [Attr; 54] = {
        use Attr::*;
        [
            Display, Fill, FillOpacity, FillRule, FontSize, Id, Offset, StopColor, StopOpacity,
            Stroke, StrokeWidth, StrokeDasharray, StrokeDashoffset, StrokeOpacity, StrokeLinecap,
            StrokeLinejoin, StrokeMiterlimit, Style, Transform, SvgWidth, SvgHeight, SvgViewbox,
            SvgAspectratio, PathD, PolyPoints, RectX, RectY, RectWidth, RectHeight, RectRx, RectRy,
            CircleCx, CircleCy, CircleR, EllipseCx, EllipseCy, EllipseRx, EllipseRy, LineX1,
            LineY1, LineX2, LineY2, LGradientX1, LGradientY1, LGradientX2, LGradientY2,
            RGradientCx, RGradientCy, RGradientR, RGradientFx, RGradientFy, GradientUnits,
            GradientTransform, GradientSpread,
        ]
    };
    let mut out: Vec<Attr> = ALL.iter().copied().filter(|a| node.attr.is_set(*a)).collect();
    if node.attr.is_set(Attr::GradientHref) {
        out.push(Attr::GradientHref);
    }
    out
}

pub fn text_value(doc: &Document, node: &Node, attr: Attr) -> Option<String> {
    use Attr::*;
    Some(match attr {
        Style | None => return Option::None,
        Display => node.attr.display.name().to_string(),
        Fill => fmt_color(node.attr.fill),
        FillOpacity => fmt_num(node.attr.fill_opacity),
        FillRule => node.attr.fill_rule.name().to_string(),
        FontSize => fmt_length(node.attr.font_size),
        Id => node.attr.id.0.clone(),
        Offset => fmt_length(node.attr.stop_offset),
        StopColor => fmt_color(node.attr.stop_color),
        StopOpacity => fmt_num(node.attr.stop_opacity),
        Stroke => fmt_color(node.attr.stroke),
        StrokeWidth => fmt_length(node.attr.stroke_width),
        StrokeDasharray => fmt_dasharray(&node.attr.stroke_dasharray),
        StrokeDashoffset => fmt_length(node.attr.stroke_dashoffset),
        StrokeOpacity => fmt_num(node.attr.stroke_opacity),
        StrokeLinecap => node.attr.stroke_linecap.name().to_string(),
        StrokeLinejoin => node.attr.stroke_linejoin.name().to_string(),
        StrokeMiterlimit => fmt_num(node.attr.stroke_miterlimit),
        Transform => fmt_transform(&node.attr.xform),
        SvgWidth => payload_svg(node).map(|p| fmt_length(p.width))?,
        SvgHeight => payload_svg(node).map(|p| fmt_length(p.height))?,
        SvgViewbox => payload_svg(node).map(|p| fmt_viewbox(&p.viewbox))?,
        SvgAspectratio => payload_svg(node).map(|p| fmt_aspectratio(&p.aspectratio))?,
        PathD => match &node.payload {
            Payload::Path(p) => fmt_path_d(doc, p),
            _ => return Option::None,
        },
        PolyPoints => match &node.payload {
            Payload::Polyline(p) | Payload::Polygon(p) => fmt_points(doc, p.point_offset, p.point_count),
            _ => return Option::None,
        },
        RectX => payload_rect(node).map(|p| fmt_length(p.x))?,
        RectY => payload_rect(node).map(|p| fmt_length(p.y))?,
        RectWidth => payload_rect(node).map(|p| fmt_length(p.width))?,
        RectHeight => payload_rect(node).map(|p| fmt_length(p.height))?,
        RectRx => payload_rect(node).map(|p| fmt_length(p.rx))?,
        RectRy => payload_rect(node).map(|p| fmt_length(p.ry))?,
        CircleCx => payload_circle(node).map(|p| fmt_length(p.cx))?,
        CircleCy => payload_circle(node).map(|p| fmt_length(p.cy))?,
        CircleR => payload_circle(node).map(|p| fmt_length(p.r))?,
        EllipseCx => payload_ellipse(node).map(|p| fmt_length(p.cx))?,
        EllipseCy => payload_ellipse(node).map(|p| fmt_length(p.cy))?,
        EllipseRx => payload_ellipse(node).map(|p| fmt_length(p.rx))?,
        EllipseRy => payload_ellipse(node).map(|p| fmt_length(p.ry))?,
        LineX1 => payload_line(node).map(|p| fmt_length(p.x1))?,
        LineY1 => payload_line(node).map(|p| fmt_length(p.y1))?,
        LineX2 => payload_line(node).map(|p| fmt_length(p.x2))?,
        LineY2 => payload_line(node).map(|p| fmt_length(p.y2))?,
        LGradientX1 => payload_gradient(node).map(|p| fmt_length(p.a))?,
        LGradientY1 => payload_gradient(node).map(|p| fmt_length(p.b))?,
        LGradientX2 => payload_gradient(node).map(|p| fmt_length(p.c))?,
        LGradientY2 => payload_gradient(node).map(|p| fmt_length(p.d))?,
        RGradientCx => payload_gradient(node).map(|p| fmt_length(p.a))?,
        RGradientCy => payload_gradient(node).map(|p| fmt_length(p.b))?,
        RGradientR => payload_gradient(node).map(|p| fmt_length(p.c))?,
        RGradientFx => payload_gradient(node).map(|p| fmt_length(p.d))?,
        RGradientFy => payload_gradient(node).map(|p| fmt_length(p.e))?,
        GradientUnits => payload_gradient(node).map(|p| p.units.name().to_string())?,
        GradientTransform => payload_gradient(node).map(|p| fmt_transform(&p.xform))?,
        GradientSpread => payload_gradient(node).map(|p| p.spread.name().to_string())?,
        GradientHref => payload_gradient(node).map(|p| format!("#{}", p.href.0))?,
    })
}

fn payload_svg(node: &Node) -> Option<&SvgPayload> {
    match &node.payload {
        Payload::Svg(p) => Some(p),
        _ => Option::None,
    }
}
fn payload_rect(node: &Node) -> Option<&RectPayload> {
    match &node.payload {
        Payload::Rect(p) => Some(p),
        _ => Option::None,
    }
}
fn payload_circle(node: &Node) -> Option<&CirclePayload> {
    match &node.payload {
        Payload::Circle(p) => Some(p),
        _ => Option::None,
    }
}
fn payload_ellipse(node: &Node) -> Option<&EllipsePayload> {
    match &node.payload {
        Payload::Ellipse(p) => Some(p),
        _ => Option::None,
    }
}
fn payload_line(node: &Node) -> Option<&LinePayload> {
    match &node.payload {
        Payload::Line(p) => Some(p),
        _ => Option::None,
    }
}
fn payload_gradient(node: &Node) -> Option<&GradientPayload> {
    match &node.payload {
        Payload::LGradient(p) | Payload::RGradient(p) => Some(p),
        _ => Option::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_drops_trailing_zero_for_integers() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(3.5), "3.5");
    }

    #[test]
    fn fmt_color_renders_hex_or_none() {
        assert_eq!(fmt_color(Color::rgb(0xff0000)), "#ff0000");
        assert_eq!(fmt_color(Color::default()), "none");
    }
}
