//! Encodes a [`Document`] into the compact binary format: a one-byte
//! element id, then `(attr id, payload)` pairs terminated by
//! `Attr::None`, then the node's children, then an `Element::None`
//! terminator — ported from `musvg_emit_binary_begin`/`_end`. Scalar
//! floats go through either the vf128 codec or plain IEEE bit patterns
//! depending on [`FloatCodec`], matching the format's two binary
//! flavors.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::float::{ieee, vf128};
use crate::svg::attr_text::present_attrs;
use crate::svg::attrs::Attr;
use crate::svg::model::*;
use crate::vlu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatCodec {
    Vf128,
    Ieee,
}

impl FloatCodec {
    fn write_f32(self, buf: &mut Buffer, v: f32) -> Result<()> {
        match self {
            FloatCodec::Vf128 => vf128::write_f32(buf, v).map(|_| ()),
            FloatCodec::Ieee => ieee::write_f32(buf, v).map(|_| ()),
        }
    }
}

pub fn emit(doc: &Document, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    emit_siblings(doc, doc.root, codec, buf)
}

fn emit_siblings(doc: &Document, first: NodeRef, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    let mut cur = first;
    while !cur.is_none() {
        emit_node(doc, cur, codec, buf)?;
        cur = doc.node(cur).next;
    }
    buf.write_u8(Element::None as u8)?;
    Ok(())
}

fn emit_node(doc: &Document, node_ref: NodeRef, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    let node = doc.node(node_ref);
    buf.write_u8(node.element as u8)?;
    for attr in present_attrs(node) {
        buf.write_u8(attr as u8)?;
        write_attr(doc, node, attr, codec, buf)?;
    }
    buf.write_u8(Attr::None as u8)?;

    let first_child = doc.children(node_ref).next().unwrap_or(NodeRef::NONE);
    if first_child.is_none() {
        buf.write_u8(Element::None as u8)?;
    } else {
        emit_siblings(doc, first_child, codec, buf)?;
    }
    Ok(())
}

fn write_length(l: Length, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    buf.write_u8(unit_to_u8(l.units))?;
    codec.write_f32(buf, l.value)
}

fn write_color(c: Color, buf: &mut Buffer) -> Result<()> {
    buf.write_u8(c.present as u8)?;
    if c.present {
        buf.write_i32(c.rgb as i32)?;
    }
    Ok(())
}

fn write_transform(t: &Transform, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    buf.write_u8(transform_kind_to_u8(t.kind))?;
    if t.kind == TransformKind::Matrix {
        for v in t.matrix {
            codec.write_f32(buf, v)?;
        }
    } else {
        buf.write_u8(t.nargs)?;
        for v in &t.args[..t.nargs as usize] {
            codec.write_f32(buf, *v)?;
        }
    }
    Ok(())
}

fn write_dasharray(d: &DashArray, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    buf.write_u8(d.count)?;
    for v in &d.dashes[..d.count as usize] {
        codec.write_f32(buf, *v)?;
    }
    Ok(())
}

fn write_floats_run(doc: &Document, offset: u32, count: u32, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    vlu::write(buf, count as u64)?;
    for v in doc.floats(offset, count) {
        codec.write_f32(buf, *v)?;
    }
    Ok(())
}

fn write_attr(doc: &Document, node: &Node, attr: Attr, codec: FloatCodec, buf: &mut Buffer) -> Result<()> {
    use Attr::*;
    match attr {
        Display => buf.write_u8(node.attr.display as u8).map(|_| ())?,
        Fill => write_color(node.attr.fill, buf)?,
        FillOpacity => codec.write_f32(buf, node.attr.fill_opacity)?,
        FillRule => buf.write_u8(node.attr.fill_rule as u8).map(|_| ())?,
        FontSize => write_length(node.attr.font_size, codec, buf)?,
        Id => {
            vlu::write(buf, node.attr.id.0.len() as u64)?;
            buf.write_bytes(node.attr.id.0.as_bytes())?;
        }
        Offset => write_length(node.attr.stop_offset, codec, buf)?,
        StopColor => write_color(node.attr.stop_color, buf)?,
        StopOpacity => codec.write_f32(buf, node.attr.stop_opacity)?,
        Stroke => write_color(node.attr.stroke, buf)?,
        StrokeWidth => write_length(node.attr.stroke_width, codec, buf)?,
        StrokeDasharray => write_dasharray(&node.attr.stroke_dasharray, codec, buf)?,
        StrokeDashoffset => write_length(node.attr.stroke_dashoffset, codec, buf)?,
        StrokeOpacity => codec.write_f32(buf, node.attr.stroke_opacity)?,
        StrokeLinecap => buf.write_u8(node.attr.stroke_linecap as u8).map(|_| ())?,
        StrokeLinejoin => buf.write_u8(node.attr.stroke_linejoin as u8).map(|_| ())?,
        StrokeMiterlimit => codec.write_f32(buf, node.attr.stroke_miterlimit)?,
        Transform => write_transform(&node.attr.xform, codec, buf)?,
        SvgWidth => write_length(payload_svg(node).width, codec, buf)?,
        SvgHeight => write_length(payload_svg(node).height, codec, buf)?,
        SvgViewbox => {
            let vb = payload_svg(node).viewbox;
            codec.write_f32(buf, vb.x)?;
            codec.write_f32(buf, vb.y)?;
            codec.write_f32(buf, vb.width)?;
            codec.write_f32(buf, vb.height)?;
        }
        SvgAspectratio => {
            let ar = payload_svg(node).aspectratio;
            buf.write_u8(ar.align_x as u8)?;
            buf.write_u8(ar.align_y as u8)?;
            buf.write_u8(ar.crop as u8)?;
        }
        PathD => {
            let p = payload_path(node);
            vlu::write(buf, p.op_count as u64)?;
            for op in &doc.path_ops[p.op_offset as usize..(p.op_offset + p.op_count) as usize] {
                buf.write_u8(op.code as u8)?;
                write_floats_run(doc, op.point_offset, op.point_count, codec, buf)?;
            }
        }
        PolyPoints => {
            let (offset, count) = payload_points(node);
            write_floats_run(doc, offset, count, codec, buf)?;
        }
        RectX => write_length(payload_rect(node).x, codec, buf)?,
        RectY => write_length(payload_rect(node).y, codec, buf)?,
        RectWidth => write_length(payload_rect(node).width, codec, buf)?,
        RectHeight => write_length(payload_rect(node).height, codec, buf)?,
        RectRx => write_length(payload_rect(node).rx, codec, buf)?,
        RectRy => write_length(payload_rect(node).ry, codec, buf)?,
        CircleCx => write_length(payload_circle(node).cx, codec, buf)?,
        CircleCy => write_length(payload_circle(node).cy, codec, buf)?,
        CircleR => write_length(payload_circle(node).r, codec, buf)?,
        EllipseCx => write_length(payload_ellipse(node).cx, codec, buf)?,
        EllipseCy => write_length(payload_ellipse(node).cy, codec, buf)?,
        EllipseRx => write_length(payload_ellipse(node).rx, codec, buf)?,
        EllipseRy => write_length(payload_ellipse(node).ry, codec, buf)?,
        LineX1 => write_length(payload_line(node).x1, codec, buf)?,
        LineY1 => write_length(payload_line(node).y1, codec, buf)?,
        LineX2 => write_length(payload_line(node).x2, codec, buf)?,
        LineY2 => write_length(payload_line(node).y2, codec, buf)?,
        LGradientX1 => write_length(payload_gradient(node).a, codec, buf)?,
        LGradientY1 => write_length(payload_gradient(node).b, codec, buf)?,
        LGradientX2 => write_length(payload_gradient(node).c, codec, buf)?,
        LGradientY2 => write_length(payload_gradient(node).d, codec, buf)?,
        RGradientCx => write_length(payload_gradient(node).a, codec, buf)?,
        RGradientCy => write_length(payload_gradient(node).b, codec, buf)?,
        RGradientR => write_length(payload_gradient(node).c, codec, buf)?,
        RGradientFx => write_length(payload_gradient(node).d, codec, buf)?,
        RGradientFy => write_length(payload_gradient(node).e, codec, buf)?,
        GradientUnits => buf.write_u8(payload_gradient(node).units as u8).map(|_| ())?,
        GradientTransform => write_transform(&payload_gradient(node).xform, codec, buf)?,
        GradientSpread => buf.write_u8(payload_gradient(node).spread as u8).map(|_| ())?,
        GradientHref => {
            let href = &payload_gradient(node).href.0;
            vlu::write(buf, href.len() as u64)?;
            buf.write_bytes(href.as_bytes())?;
        }
        Style | None => {}
    }
    Ok(())
}

fn unit_to_u8(u: crate::svg::attrs::Unit) -> u8 {
    use crate::svg::attrs::Unit::*;
    match u {
        Default => 0,
        User => 1,
        Px => 2,
        Pt => 3,
        Pc => 4,
        Mm => 5,
        Cm => 6,
        In => 7,
        Percent => 8,
        Em => 9,
        Ex => 10,
    }
}

fn transform_kind_to_u8(k: TransformKind) -> u8 {
    use TransformKind::*;
    match k {
        Matrix => 0,
        Translate => 1,
        Scale => 2,
        Rotate => 3,
        SkewX => 4,
        SkewY => 5,
    }
}

fn payload_svg(node: &Node) -> &SvgPayload {
    match &node.payload {
        Payload::Svg(p) => p,
        _ => panic!("attribute/payload mismatch"),
    }
}
fn payload_rect(node: &Node) -> &RectPayload {
    match &node.payload {
        Payload::Rect(p) => p,
        _ => panic!("attribute/payload mismatch"),
    }
}
fn payload_circle(node: &Node) -> &CirclePayload {
    match &node.payload {
        Payload::Circle(p) => p,
        _ => panic!("attribute/payload mismatch"),
    }
}
fn payload_ellipse(node: &Node) -> &EllipsePayload {
    match &node.payload {
        Payload::Ellipse(p) => p,
        _ => panic!("attribute/payload mismatch"),
    }
}
fn payload_line(node: &Node) -> &LinePayload {
    match &node.payload {
        Payload::Line(p) => p,
        _ => panic!("attribute/payload mismatch"),
    }
}
fn payload_gradient(node: &Node) -> &GradientPayload {
    match &node.payload {
        Payload::LGradient(p) | Payload::RGradient(p) => p,
        _ => panic!("attribute/payload mismatch"),
    }
}
fn payload_path(node: &Node) -> &PathPayload {
    match &node.payload {
        Payload::Path(p) => p,
        _ => panic!("attribute/payload mismatch"),
    }
}
fn payload_points(node: &Node) -> (u32, u32) {
    match &node.payload {
        Payload::Polyline(p) | Payload::Polygon(p) => (p.point_offset, p.point_count),
        _ => panic!("attribute/payload mismatch"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_xml;

    #[test]
    fn encodes_terminator_bytes_around_node_and_siblings() {
        let doc = parse_xml::parse(r#"<svg width="10"><rect/><circle/></svg>"#).unwrap();
        let mut buf = Buffer::resizable();
        emit(&doc, FloatCodec::Vf128, &mut buf).unwrap();
        let bytes = buf.unread().to_vec();
        assert_eq!(bytes[0], Element::Svg as u8);
        assert!(bytes.len() > 4);
    }
}
