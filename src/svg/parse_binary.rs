//! Decodes the binary format produced by [`emit_binary`](super::emit_binary)
//! back into a [`Document`], mirroring `musvg_read_binary_*`.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::float::{ieee, vf128};
use crate::svg::attrs::{Attr, Align, Crop, FillRule, GradientSpread, GradientUnit, LineCap, LineJoin, Unit};
use crate::svg::emit_binary::FloatCodec;
use crate::svg::model::*;
use crate::vlu;

impl FloatCodec {
    fn read_f32(self, buf: &mut Buffer) -> Result<f32> {
        match self {
            FloatCodec::Vf128 => vf128::read_f32(buf),
            FloatCodec::Ieee => ieee::read_f32(buf),
        }
    }
}

pub fn parse(buf: &mut Buffer, codec: FloatCodec) -> Result<Document> {
    let mut doc = Document::new();
    let first = parse_siblings(&mut doc, buf, codec, NodeRef::NONE)?;
    doc.root = first;
    Ok(doc)
}

fn parse_siblings(doc: &mut Document, buf: &mut Buffer, codec: FloatCodec, parent: NodeRef) -> Result<NodeRef> {
    let mut first = NodeRef::NONE;
    let mut prev = NodeRef::NONE;
    loop {
        let tag = buf.read_u8()?;
        let Some(element) = Element::from_u8(tag) else {
            if tag == Element::None as u8 {
                return Ok(first);
            }
            return Err(Error::FormatViolation("unknown element id"));
        };
        let node_ref = doc.push_node(Node::new(element, parent));
        read_attrs(doc, buf, codec, node_ref, element)?;
        let child = parse_siblings(doc, buf, codec, node_ref)?;
        let _ = child; // children already linked via their own `.parent`

        if first.is_none() {
            first = node_ref;
        }
        if !prev.is_none() {
            doc.node_mut(prev).next = node_ref;
        }
        prev = node_ref;
    }
}

fn read_attrs(doc: &mut Document, buf: &mut Buffer, codec: FloatCodec, node_ref: NodeRef, element: Element) -> Result<()> {
    ensure_payload(doc, node_ref, element);
    loop {
        let tag = buf.read_u8()?;
        let Some(attr) = Attr::from_u8(tag) else {
            return Err(Error::FormatViolation("unknown attribute id"));
        };
        if attr == Attr::None {
            return Ok(());
        }
        doc.node_mut(node_ref).attr.set(attr);
        read_attr(doc, buf, codec, node_ref, attr)?;
    }
}

fn ensure_payload(doc: &mut Document, node_ref: NodeRef, element: Element) {
    let node = doc.node_mut(node_ref);
    node.payload = match element {
        Element::Svg => Payload::Svg(SvgPayload::default()),
        Element::Path => Payload::Path(PathPayload::default()),
        Element::Rect => Payload::Rect(RectPayload::default()),
        Element::Circle => Payload::Circle(CirclePayload::default()),
        Element::Ellipse => Payload::Ellipse(EllipsePayload::default()),
        Element::Line => Payload::Line(LinePayload::default()),
        Element::Polyline => Payload::Polyline(PointsPayload::default()),
        Element::Polygon => Payload::Polygon(PointsPayload::default()),
        Element::LGradient => Payload::LGradient(GradientPayload::default()),
        Element::RGradient => Payload::RGradient(GradientPayload::default()),
        Element::G | Element::Defs | Element::Stop | Element::None => Payload::None,
    };
}

fn read_length(codec: FloatCodec, buf: &mut Buffer) -> Result<Length> {
    let units = unit_from_u8(buf.read_u8()?)?;
    let value = codec.read_f32(buf)?;
    Ok(Length { value, units })
}

fn read_color(buf: &mut Buffer) -> Result<Color> {
    let present = buf.read_u8()? != 0;
    let rgb = if present { buf.read_i32()? as u32 } else { 0 };
    Ok(Color { rgb, present })
}

fn read_transform(codec: FloatCodec, buf: &mut Buffer) -> Result<Transform> {
    let kind = transform_kind_from_u8(buf.read_u8()?)?;
    if kind == TransformKind::Matrix {
        let mut matrix = [0.0f32; 6];
        for slot in &mut matrix {
            *slot = codec.read_f32(buf)?;
        }
        Ok(Transform { kind, args: [0.0; 3], nargs: 0, matrix })
    } else {
        let nargs = buf.read_u8()?;
        let mut args = [0.0f32; 3];
        for slot in args.iter_mut().take(nargs as usize) {
            *slot = codec.read_f32(buf)?;
        }
        let built = crate::svg::value::build_transform(kind, &args[..nargs as usize]);
        Ok(Transform { kind, args, nargs, matrix: built.matrix })
    }
}

fn read_dasharray(codec: FloatCodec, buf: &mut Buffer) -> Result<DashArray> {
    let count = buf.read_u8()?;
    let mut dashes = [0.0f32; 8];
    for slot in dashes.iter_mut().take(count as usize) {
        *slot = codec.read_f32(buf)?;
    }
    Ok(DashArray { dashes, count })
}

fn read_floats_run(doc: &mut Document, codec: FloatCodec, buf: &mut Buffer) -> Result<(u32, u32)> {
    let count = vlu::read(buf)? as u32;
    let mut vals = Vec::with_capacity(count as usize);
    for _ in 0..count {
        vals.push(codec.read_f32(buf)?);
    }
    Ok(doc.push_floats(&vals))
}

fn read_string(buf: &mut Buffer) -> Result<String> {
    let len = vlu::read(buf)? as usize;
    let mut bytes = vec![0u8; len];
    buf.read_bytes(&mut bytes)?;
    String::from_utf8(bytes).map_err(|_| Error::Utf8)
}

fn read_attr(doc: &mut Document, buf: &mut Buffer, codec: FloatCodec, node_ref: NodeRef, attr: Attr) -> Result<()> {
    use Attr::*;
    match attr {
        Display => {
            let v = display_from_u8(buf.read_u8()?)?;
            doc.node_mut(node_ref).attr.display = v;
        }
        Fill => {
            let v = read_color(buf)?;
            doc.node_mut(node_ref).attr.fill = v;
        }
        FillOpacity => {
            let v = codec.read_f32(buf)?;
            doc.node_mut(node_ref).attr.fill_opacity = v;
        }
        FillRule => {
            let raw = buf.read_u8()?;
            doc.node_mut(node_ref).attr.fill_rule = fill_rule_from_u8(raw)?;
        }
        FontSize => {
            let v = read_length(codec, buf)?;
            doc.node_mut(node_ref).attr.font_size = v;
        }
        Id => {
            let v = read_string(buf)?;
            doc.node_mut(node_ref).attr.id.set(&v);
        }
        Offset => {
            let v = read_length(codec, buf)?;
            doc.node_mut(node_ref).attr.stop_offset = v;
        }
        StopColor => {
            let v = read_color(buf)?;
            doc.node_mut(node_ref).attr.stop_color = v;
        }
        StopOpacity => {
            let v = codec.read_f32(buf)?;
            doc.node_mut(node_ref).attr.stop_opacity = v;
        }
        Stroke => {
            let v = read_color(buf)?;
            doc.node_mut(node_ref).attr.stroke = v;
        }
        StrokeWidth => {
            let v = read_length(codec, buf)?;
            doc.node_mut(node_ref).attr.stroke_width = v;
        }
        StrokeDasharray => {
            let v = read_dasharray(codec, buf)?;
            doc.node_mut(node_ref).attr.stroke_dasharray = v;
        }
        StrokeDashoffset => {
            let v = read_length(codec, buf)?;
            doc.node_mut(node_ref).attr.stroke_dashoffset = v;
        }
        StrokeOpacity => {
            let v = codec.read_f32(buf)?;
            doc.node_mut(node_ref).attr.stroke_opacity = v;
        }
        StrokeLinecap => {
            let raw = buf.read_u8()?;
            doc.node_mut(node_ref).attr.stroke_linecap = linecap_from_u8(raw)?;
        }
        StrokeLinejoin => {
            let raw = buf.read_u8()?;
            doc.node_mut(node_ref).attr.stroke_linejoin = linejoin_from_u8(raw)?;
        }
        StrokeMiterlimit => {
            let v = codec.read_f32(buf)?;
            doc.node_mut(node_ref).attr.stroke_miterlimit = v;
        }
        Transform => {
            let v = read_transform(codec, buf)?;
            doc.node_mut(node_ref).attr.xform = v;
        }
        SvgWidth => {
            let v = read_length(codec, buf)?;
            svg_mut(doc, node_ref).width = v;
        }
        SvgHeight => {
            let v = read_length(codec, buf)?;
            svg_mut(doc, node_ref).height = v;
        }
        SvgViewbox => {
            let vb = ViewBox {
                x: codec.read_f32(buf)?,
                y: codec.read_f32(buf)?,
                width: codec.read_f32(buf)?,
                height: codec.read_f32(buf)?,
            };
            svg_mut(doc, node_ref).viewbox = vb;
        }
        SvgAspectratio => {
            let ar = AspectRatio {
                align_x: align_from_u8(buf.read_u8()?)?,
                align_y: align_from_u8(buf.read_u8()?)?,
                crop: crop_from_u8(buf.read_u8()?)?,
            };
            svg_mut(doc, node_ref).aspectratio = ar;
        }
        PathD => {
            let op_count = vlu::read(buf)? as u32;
            let op_offset = doc.path_ops.len() as u32;
            for _ in 0..op_count {
                let code = path_opcode_from_u8(buf.read_u8()?)?;
                let (point_offset, point_count) = read_floats_run(doc, codec, buf)?;
                doc.path_ops.push(PathOp { code, point_offset, point_count });
            }
            let node = doc.node_mut(node_ref);
            node.payload = Payload::Path(PathPayload { op_offset, op_count });
        }
        PolyPoints => {
            let (point_offset, point_count) = read_floats_run(doc, codec, buf)?;
            let node = doc.node_mut(node_ref);
            node.payload = match node.element {
                Element::Polygon => Payload::Polygon(PointsPayload { point_offset, point_count }),
                _ => Payload::Polyline(PointsPayload { point_offset, point_count }),
            };
        }
        RectX => rect_mut(doc, node_ref).x = read_length(codec, buf)?,
        RectY => rect_mut(doc, node_ref).y = read_length(codec, buf)?,
        RectWidth => rect_mut(doc, node_ref).width = read_length(codec, buf)?,
        RectHeight => rect_mut(doc, node_ref).height = read_length(codec, buf)?,
        RectRx => rect_mut(doc, node_ref).rx = read_length(codec, buf)?,
        RectRy => rect_mut(doc, node_ref).ry = read_length(codec, buf)?,
        CircleCx => circle_mut(doc, node_ref).cx = read_length(codec, buf)?,
        CircleCy => circle_mut(doc, node_ref).cy = read_length(codec, buf)?,
        CircleR => circle_mut(doc, node_ref).r = read_length(codec, buf)?,
        EllipseCx => ellipse_mut(doc, node_ref).cx = read_length(codec, buf)?,
        EllipseCy => ellipse_mut(doc, node_ref).cy = read_length(codec, buf)?,
        EllipseRx => ellipse_mut(doc, node_ref).rx = read_length(codec, buf)?,
        EllipseRy => ellipse_mut(doc, node_ref).ry = read_length(codec, buf)?,
        LineX1 => line_mut(doc, node_ref).x1 = read_length(codec, buf)?,
        LineY1 => line_mut(doc, node_ref).y1 = read_length(codec, buf)?,
        LineX2 => line_mut(doc, node_ref).x2 = read_length(codec, buf)?,
        LineY2 => line_mut(doc, node_ref).y2 = read_length(codec, buf)?,
        LGradientX1 => gradient_mut(doc, node_ref).a = read_length(codec, buf)?,
        LGradientY1 => gradient_mut(doc, node_ref).b = read_length(codec, buf)?,
        LGradientX2 => gradient_mut(doc, node_ref).c = read_length(codec, buf)?,
        LGradientY2 => gradient_mut(doc, node_ref).d = read_length(codec, buf)?,
        RGradientCx => gradient_mut(doc, node_ref).a = read_length(codec, buf)?,
        RGradientCy => gradient_mut(doc, node_ref).b = read_length(codec, buf)?,
        RGradientR => gradient_mut(doc, node_ref).c = read_length(codec, buf)?,
        RGradientFx => gradient_mut(doc, node_ref).d = read_length(codec, buf)?,
        RGradientFy => gradient_mut(doc, node_ref).e = read_length(codec, buf)?,
        GradientUnits => {
            let raw = buf.read_u8()?;
            gradient_mut(doc, node_ref).units = gradient_unit_from_u8(raw)?;
        }
        GradientTransform => {
            let v = read_transform(codec, buf)?;
            gradient_mut(doc, node_ref).xform = v;
        }
        GradientSpread => {
            let raw = buf.read_u8()?;
            gradient_mut(doc, node_ref).spread = gradient_spread_from_u8(raw)?;
        }
        GradientHref => {
            let v = read_string(buf)?;
            gradient_mut(doc, node_ref).href.set(&v);
        }
        Style | None => {}
    }
    Ok(())
}

fn svg_mut(doc: &mut Document, r: NodeRef) -> &mut SvgPayload {
    match &mut doc.node_mut(r).payload {
        Payload::Svg(p) => p,
        _ => unreachable!("ensure_payload always sets a matching payload first"),
    }
}
fn rect_mut(doc: &mut Document, r: NodeRef) -> &mut RectPayload {
    match &mut doc.node_mut(r).payload {
        Payload::Rect(p) => p,
        _ => unreachable!("ensure_payload always sets a matching payload first"),
    }
}
fn circle_mut(doc: &mut Document, r: NodeRef) -> &mut CirclePayload {
    match &mut doc.node_mut(r).payload {
        Payload::Circle(p) => p,
        _ => unreachable!("ensure_payload always sets a matching payload first"),
    }
}
fn ellipse_mut(doc: &mut Document, r: NodeRef) -> &mut EllipsePayload {
    match &mut doc.node_mut(r).payload {
        Payload::Ellipse(p) => p,
        _ => unreachable!("ensure_payload always sets a matching payload first"),
    }
}
fn line_mut(doc: &mut Document, r: NodeRef) -> &mut LinePayload {
    match &mut doc.node_mut(r).payload {
        Payload::Line(p) => p,
        _ => unreachable!("ensure_payload always sets a matching payload first"),
    }
}
fn gradient_mut(doc: &mut Document, r: NodeRef) -> &mut GradientPayload {
    match &mut doc.node_mut(r).payload {
        Payload::LGradient(p) | Payload::RGradient(p) => p,
        _ => unreachable!("ensure_payload always sets a matching payload first"),
    }
}

fn unit_from_u8(v: u8) -> Result<Unit> {
    use Unit::*;
    Ok(match v {
        0 => Default,
        1 => User,
        2 => Px,
        3 => Pt,
        4 => Pc,
        5 => Mm,
        6 => Cm,
        7 => In,
        8 => Percent,
        9 => Em,
        10 => Ex,
        _ => return Err(Error::FormatViolation("invalid unit code")),
    })
}

fn transform_kind_from_u8(v: u8) -> Result<TransformKind> {
    use TransformKind::*;
    Ok(match v {
        0 => Matrix,
        1 => Translate,
        2 => Scale,
        3 => Rotate,
        4 => SkewX,
        5 => SkewY,
        _ => return Err(Error::FormatViolation("invalid transform type code")),
    })
}

fn display_from_u8(v: u8) -> Result<crate::svg::attrs::Display> {
    use crate::svg::attrs::Display::{self, *};
    Ok(match v % (Display::LIMIT as u8 + 1) {
        0 => Default,
        1 => Inline,
        _ => None,
    })
}

fn fill_rule_from_u8(v: u8) -> Result<FillRule> {
    use FillRule::*;
    Ok(match v % (FillRule::LIMIT as u8 + 1) {
        0 => Default,
        1 => Nonzero,
        _ => Evenodd,
    })
}

fn linecap_from_u8(v: u8) -> Result<LineCap> {
    use LineCap::*;
    Ok(match v % (LineCap::LIMIT as u8 + 1) {
        0 => Default,
        1 => Butt,
        2 => Round,
        _ => Square,
    })
}

fn linejoin_from_u8(v: u8) -> Result<LineJoin> {
    use LineJoin::*;
    Ok(match v % (LineJoin::LIMIT as u8 + 1) {
        0 => Default,
        1 => Miter,
        2 => Round,
        _ => Bevel,
    })
}

fn align_from_u8(v: u8) -> Result<Align> {
    use Align::*;
    Ok(match v % 5 {
        0 => Default,
        1 => None,
        2 => Min,
        3 => Mid,
        _ => Max,
    })
}

fn crop_from_u8(v: u8) -> Result<Crop> {
    use Crop::*;
    Ok(match v % 4 {
        0 => Default,
        1 => None,
        2 => Meet,
        _ => Slice,
    })
}

fn gradient_unit_from_u8(v: u8) -> Result<GradientUnit> {
    use GradientUnit::*;
    Ok(match v % (GradientUnit::LIMIT as u8 + 1) {
        0 => Default,
        1 => User,
        _ => ObjectBoundingBox,
    })
}

fn gradient_spread_from_u8(v: u8) -> Result<GradientSpread> {
    use GradientSpread::*;
    Ok(match v % (GradientSpread::LIMIT as u8 + 1) {
        0 => Default,
        1 => Pad,
        2 => Reflect,
        _ => Repeat,
    })
}

fn path_opcode_from_u8(v: u8) -> Result<crate::svg::attrs::PathOpcode> {
    crate::svg::attrs::PathOpcode::from_index(v as usize)
        .ok_or(Error::FormatViolation("invalid path opcode"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::emit_binary::emit;
    use crate::svg::parse_xml;

    #[test]
    fn round_trips_a_small_document_through_vf128_binary() {
        let doc = parse_xml::parse(r##"<svg width="10" height="20"><rect x="1" y="2" width="3" height="4" fill="#ff0000"/></svg>"##).unwrap();
        let mut buf = Buffer::resizable();
        emit(&doc, FloatCodec::Vf128, &mut buf).unwrap();
        let mut bytes = buf.unread().to_vec();
        let mut read_buf = Buffer::borrowed(&mut bytes);
        let decoded = parse(&mut read_buf, FloatCodec::Vf128).unwrap();
        assert_eq!(decoded.nodes.len(), doc.nodes.len());
        let root = decoded.node(decoded.root);
        assert_eq!(root.element, Element::Svg);
        let rect = decoded.node(decoded.children(decoded.root).next().unwrap());
        match &rect.payload {
            Payload::Rect(r) => assert_eq!(r.width.value, 3.0),
            _ => panic!("expected rect payload"),
        }
        assert_eq!(rect.attr.fill.rgb, 0xff0000);
    }
}
