//! Builds a [`Document`] from SVG XML text: walks [`xml::Tokenizer`]
//! events, maintaining a node stack for parent/child linking and a
//! per-depth "last sibling" cursor for the `next` chain, and dispatches
//! each attribute to the matching [`Attr`] based on the attribute name
//! and the element currently open — mirroring `musvg_parse_element`'s
//! per-element attribute tables.

use crate::error::{Error, Result};
use crate::svg::attrs::{Attr, Display, FillRule, GradientSpread, GradientUnit, LineCap, LineJoin};
use crate::svg::color;
use crate::svg::model::*;
use crate::svg::path_data;
use crate::svg::value;
use crate::svg::xml::{self, Tokenizer, XmlEvent};

pub fn parse(input: &str) -> Result<Document> {
    let mut doc = Document::new();
    let mut tok = Tokenizer::new(input);
    let mut stack: Vec<NodeRef> = Vec::new();
    let mut last_sibling: Vec<NodeRef> = Vec::new(); // parallel to stack

    while let Some(event) = tok.next_event()? {
        match event {
            XmlEvent::StartElement { name, attrs, self_closing } => {
                let Some(element) = Element::from_name(name) else {
                    if !self_closing {
                        skip_unknown_element(&mut tok, name)?;
                    }
                    continue;
                };
                let parent = stack.last().copied().unwrap_or(NodeRef::NONE);
                let mut node = Node::new(element, parent);
                apply_attrs(&mut doc, &mut node, element, &attrs)?;
                let node_ref = doc.push_node(node);
                link_sibling(&mut doc, &mut last_sibling, &stack, node_ref);
                if doc.root.is_none() && parent.is_none() {
                    doc.root = node_ref;
                }
                if !self_closing {
                    stack.push(node_ref);
                    last_sibling.push(NodeRef::NONE);
                }
            }
            XmlEvent::EndElement { .. } => {
                stack.pop();
                last_sibling.pop();
            }
            XmlEvent::Text(_) => {}
        }
    }
    Ok(doc)
}

fn link_sibling(doc: &mut Document, last_sibling: &mut [NodeRef], stack: &[NodeRef], node_ref: NodeRef) {
    if let Some(last) = last_sibling.last_mut() {
        if !last.is_none() {
            doc.node_mut(*last).next = node_ref;
        }
        *last = node_ref;
    }
}

/// An element name this parser doesn't know (e.g. `<defs>`'s render-only
/// children, metadata, title) is skipped structurally so its subtree
/// doesn't corrupt the stack, but contributes no node.
fn skip_unknown_element(tok: &mut Tokenizer, name: &str) -> Result<()> {
    let mut depth = 1;
    while depth > 0 {
        match tok.next_event()? {
            Some(XmlEvent::StartElement { self_closing: false, .. }) => depth += 1,
            Some(XmlEvent::EndElement { .. }) => depth -= 1,
            Some(_) => {}
            None => return Err(Error::FormatViolation("unclosed element")),
        }
    }
    let _ = name;
    Ok(())
}

fn apply_attrs(doc: &mut Document, node: &mut Node, element: Element, attrs: &[(&str, String)]) -> Result<()> {
    for (name, value) in attrs {
        if *name == "style" {
            node.attr.set(Attr::Style);
            for (k, v) in xml::split_style(value) {
                if let Some(attr) = resolve_attr(element, &k) {
                    apply_one(doc, node, element, attr, &v)?;
                }
            }
            continue;
        }
        if let Some(attr) = resolve_attr(element, name) {
            apply_one(doc, node, element, attr, value)?;
        }
    }
    Ok(())
}

/// Maps an XML attribute name to its [`Attr`] given the element it
/// appears on — several names (`width`, `height`, `cx`, `cy`, `x1`,
/// `y1`, `x2`, `y2`, `r`) are shared between element kinds.
fn resolve_attr(element: Element, name: &str) -> Option<Attr> {
    use Element::*;
    Some(match name {
        "display" => Attr::Display,
        "fill" => Attr::Fill,
        "fill-opacity" => Attr::FillOpacity,
        "fill-rule" => Attr::FillRule,
        "font-size" => Attr::FontSize,
        "id" => Attr::Id,
        "offset" => Attr::Offset,
        "stop-color" => Attr::StopColor,
        "stop-opacity" => Attr::StopOpacity,
        "stroke" => Attr::Stroke,
        "stroke-width" => Attr::StrokeWidth,
        "stroke-dasharray" => Attr::StrokeDasharray,
        "stroke-dashoffset" => Attr::StrokeDashoffset,
        "stroke-opacity" => Attr::StrokeOpacity,
        "stroke-linecap" => Attr::StrokeLinecap,
        "stroke-linejoin" => Attr::StrokeLinejoin,
        "stroke-miterlimit" => Attr::StrokeMiterlimit,
        "transform" => Attr::Transform,
        "width" => match element {
            Svg => Attr::SvgWidth,
            Rect => Attr::RectWidth,
            _ => return core::option::Option::None,
        },
        "height" => match element {
            Svg => Attr::SvgHeight,
            Rect => Attr::RectHeight,
            _ => return core::option::Option::None,
        },
        "viewBox" if element == Svg => Attr::SvgViewbox,
        "preserveAspectRatio" if element == Svg => Attr::SvgAspectratio,
        "d" if element == Path => Attr::PathD,
        "points" if matches!(element, Polyline | Polygon) => Attr::PolyPoints,
        "x" if element == Rect => Attr::RectX,
        "y" if element == Rect => Attr::RectY,
        "rx" => match element {
            Rect => Attr::RectRx,
            Ellipse => Attr::EllipseRx,
            _ => return core::option::Option::None,
        },
        "ry" => match element {
            Rect => Attr::RectRy,
            Ellipse => Attr::EllipseRy,
            _ => return core::option::Option::None,
        },
        "cx" => match element {
            Circle => Attr::CircleCx,
            Ellipse => Attr::EllipseCx,
            RGradient => Attr::RGradientCx,
            _ => return core::option::Option::None,
        },
        "cy" => match element {
            Circle => Attr::CircleCy,
            Ellipse => Attr::EllipseCy,
            RGradient => Attr::RGradientCy,
            _ => return core::option::Option::None,
        },
        "r" => match element {
            Circle => Attr::CircleR,
            RGradient => Attr::RGradientR,
            _ => return core::option::Option::None,
        },
        "fx" if element == RGradient => Attr::RGradientFx,
        "fy" if element == RGradient => Attr::RGradientFy,
        "x1" => match element {
            Line => Attr::LineX1,
            LGradient => Attr::LGradientX1,
            _ => return core::option::Option::None,
        },
        "y1" => match element {
            Line => Attr::LineY1,
            LGradient => Attr::LGradientY1,
            _ => return core::option::Option::None,
        },
        "x2" => match element {
            Line => Attr::LineX2,
            LGradient => Attr::LGradientX2,
            _ => return core::option::Option::None,
        },
        "y2" => match element {
            Line => Attr::LineY2,
            LGradient => Attr::LGradientY2,
            _ => return core::option::Option::None,
        },
        "gradientUnits" if matches!(element, LGradient | RGradient) => Attr::GradientUnits,
        "gradientTransform" if matches!(element, LGradient | RGradient) => Attr::GradientTransform,
        "spreadMethod" if matches!(element, LGradient | RGradient) => Attr::GradientSpread,
        "xlink:href" if matches!(element, LGradient | RGradient) => Attr::GradientHref,
        _ => return core::option::Option::None,
    })
}

fn apply_one(doc: &mut Document, node: &mut Node, element: Element, attr: Attr, value: &str) -> Result<()> {
    node.attr.set(attr);
    match attr {
        Attr::Display => node.attr.display = Display::from_name(value).unwrap_or_default(),
        Attr::Fill => node.attr.fill = color::parse(value).unwrap_or_default(),
        Attr::FillOpacity => node.attr.fill_opacity = self::value::parse_opacity(value),
        Attr::FillRule => node.attr.fill_rule = FillRule::from_name(value).unwrap_or_default(),
        Attr::FontSize => node.attr.font_size = self::value::parse_length(value),
        Attr::Id => node.attr.id.set(value),
        Attr::Offset => node.attr.stop_offset = self::value::parse_length(value),
        Attr::StopColor => node.attr.stop_color = color::parse(value).unwrap_or_default(),
        Attr::StopOpacity => node.attr.stop_opacity = self::value::parse_opacity(value),
        Attr::Stroke => node.attr.stroke = color::parse(value).unwrap_or_default(),
        Attr::StrokeWidth => node.attr.stroke_width = self::value::parse_length(value),
        Attr::StrokeDasharray => node.attr.stroke_dasharray = self::value::parse_dasharray(value),
        Attr::StrokeDashoffset => node.attr.stroke_dashoffset = self::value::parse_length(value),
        Attr::StrokeOpacity => node.attr.stroke_opacity = self::value::parse_opacity(value),
        Attr::StrokeLinecap => node.attr.stroke_linecap = LineCap::from_name(value).unwrap_or_default(),
        Attr::StrokeLinejoin => node.attr.stroke_linejoin = LineJoin::from_name(value).unwrap_or_default(),
        Attr::StrokeMiterlimit => node.attr.stroke_miterlimit = self::value::parse_miterlimit(value),
        Attr::Transform => node.attr.xform = self::value::parse_transform_list(value),
        Attr::SvgWidth | Attr::SvgHeight | Attr::SvgViewbox | Attr::SvgAspectratio => {
            apply_svg_attr(node, attr, value)
        }
        Attr::PathD => apply_path_d(doc, node, value),
        Attr::PolyPoints => apply_poly_points(doc, node, value),
        Attr::RectX | Attr::RectY | Attr::RectWidth | Attr::RectHeight | Attr::RectRx | Attr::RectRy => {
            apply_rect_attr(node, attr, value)
        }
        Attr::CircleCx | Attr::CircleCy | Attr::CircleR => apply_circle_attr(node, attr, value),
        Attr::EllipseCx | Attr::EllipseCy | Attr::EllipseRx | Attr::EllipseRy => {
            apply_ellipse_attr(node, attr, value)
        }
        Attr::LineX1 | Attr::LineY1 | Attr::LineX2 | Attr::LineY2 => apply_line_attr(node, attr, value),
        Attr::LGradientX1
        | Attr::LGradientY1
        | Attr::LGradientX2
        | Attr::LGradientY2
        | Attr::RGradientCx
        | Attr::RGradientCy
        | Attr::RGradientR
        | Attr::RGradientFx
        | Attr::RGradientFy
        | Attr::GradientUnits
        | Attr::GradientTransform
        | Attr::GradientSpread
        | Attr::GradientHref => apply_gradient_attr(node, element, attr, value),
        Attr::None | Attr::Style => {}
    }
    Ok(())
}

fn apply_svg_attr(node: &mut Node, attr: Attr, value: &str) {
    if !matches!(node.payload, Payload::Svg(_)) {
        node.payload = Payload::Svg(SvgPayload::default());
    }
    let Payload::Svg(p) = &mut node.payload else { return };
    match attr {
        Attr::SvgWidth => p.width = self::value::parse_length(value),
        Attr::SvgHeight => p.height = self::value::parse_length(value),
        Attr::SvgViewbox => p.viewbox = self::value::parse_viewbox(value),
        Attr::SvgAspectratio => p.aspectratio = self::value::parse_aspectratio(value),
        _ => {}
    }
}

fn apply_rect_attr(node: &mut Node, attr: Attr, value: &str) {
    if !matches!(node.payload, Payload::Rect(_)) {
        node.payload = Payload::Rect(RectPayload::default());
    }
    let Payload::Rect(p) = &mut node.payload else { return };
    let len = self::value::parse_length(value);
    match attr {
        Attr::RectX => p.x = len,
        Attr::RectY => p.y = len,
        Attr::RectWidth => p.width = len,
        Attr::RectHeight => p.height = len,
        Attr::RectRx => p.rx = len,
        Attr::RectRy => p.ry = len,
        _ => {}
    }
}

fn apply_circle_attr(node: &mut Node, attr: Attr, value: &str) {
    if !matches!(node.payload, Payload::Circle(_)) {
        node.payload = Payload::Circle(CirclePayload::default());
    }
    let Payload::Circle(p) = &mut node.payload else { return };
    let len = self::value::parse_length(value);
    match attr {
        Attr::CircleCx => p.cx = len,
        Attr::CircleCy => p.cy = len,
        Attr::CircleR => p.r = len,
        _ => {}
    }
}

fn apply_ellipse_attr(node: &mut Node, attr: Attr, value: &str) {
    if !matches!(node.payload, Payload::Ellipse(_)) {
        node.payload = Payload::Ellipse(EllipsePayload::default());
    }
    let Payload::Ellipse(p) = &mut node.payload else { return };
    let len = self::value::parse_length(value);
    match attr {
        Attr::EllipseCx => p.cx = len,
        Attr::EllipseCy => p.cy = len,
        Attr::EllipseRx => p.rx = len,
        Attr::EllipseRy => p.ry = len,
        _ => {}
    }
}

fn apply_line_attr(node: &mut Node, attr: Attr, value: &str) {
    if !matches!(node.payload, Payload::Line(_)) {
        node.payload = Payload::Line(LinePayload::default());
    }
    let Payload::Line(p) = &mut node.payload else { return };
    let len = self::value::parse_length(value);
    match attr {
        Attr::LineX1 => p.x1 = len,
        Attr::LineY1 => p.y1 = len,
        Attr::LineX2 => p.x2 = len,
        Attr::LineY2 => p.y2 = len,
        _ => {}
    }
}

fn apply_gradient_attr(node: &mut Node, element: Element, attr: Attr, value: &str) {
    let is_linear = element == Element::LGradient;
    let matches_kind = |p: &Payload| matches!((p, is_linear), (Payload::LGradient(_), true) | (Payload::RGradient(_), false));
    if !matches_kind(&node.payload) {
        node.payload = if is_linear {
            Payload::LGradient(GradientPayload::default())
        } else {
            Payload::RGradient(GradientPayload::default())
        };
    }
    let p = match &mut node.payload {
        Payload::LGradient(p) | Payload::RGradient(p) => p,
        _ => return,
    };
    let len = self::value::parse_length(value);
    match attr {
        Attr::LGradientX1 | Attr::RGradientCx => p.a = len,
        Attr::LGradientY1 | Attr::RGradientCy => p.b = len,
        Attr::LGradientX2 | Attr::RGradientR => p.c = len,
        Attr::LGradientY2 | Attr::RGradientFx => p.d = len,
        Attr::RGradientFy => p.e = len,
        Attr::GradientUnits => p.units = GradientUnit::from_name(value).unwrap_or_default(),
        Attr::GradientTransform => p.xform = self::value::parse_transform_list(value),
        Attr::GradientSpread => p.spread = GradientSpread::from_name(value).unwrap_or_default(),
        Attr::GradientHref => p.href.set(value.trim_start_matches('#')),
        _ => {}
    }
}

fn apply_path_d(doc: &mut Document, node: &mut Node, value: &str) {
    let parsed = path_data::parse_path(value);
    let op_offset = doc.path_ops.len() as u32;
    for (code, arg_offset, arg_count) in &parsed.ops {
        let args = &parsed.args[*arg_offset as usize..(*arg_offset + *arg_count) as usize];
        let (point_offset, point_count) = doc.push_floats(args);
        doc.path_ops.push(PathOp { code: *code, point_offset, point_count });
    }
    let op_count = doc.path_ops.len() as u32 - op_offset;
    node.payload = Payload::Path(PathPayload { op_offset, op_count });
}

fn apply_poly_points(doc: &mut Document, node: &mut Node, value: &str) {
    let floats = path_data::parse_point_list(value);
    let (point_offset, point_count) = doc.push_floats(&floats);
    node.payload = match node.element {
        Element::Polygon => Payload::Polygon(PointsPayload { point_offset, point_count }),
        _ => Payload::Polyline(PointsPayload { point_offset, point_count }),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_svg_with_one_rect_child() {
        let doc = parse(r#"<svg width="100" height="100"><rect x="1" y="2" width="3" height="4"/></svg>"#).unwrap();
        assert!(!doc.root.is_none());
        let root = doc.node(doc.root);
        assert_eq!(root.element, Element::Svg);
        let children: Vec<_> = doc.children(doc.root).collect();
        assert_eq!(children.len(), 1);
        let rect = doc.node(children[0]);
        assert_eq!(rect.element, Element::Rect);
        match &rect.payload {
            Payload::Rect(r) => {
                assert_eq!(r.x.value, 1.0);
                assert_eq!(r.width.value, 3.0);
            }
            _ => panic!("expected rect payload"),
        }
    }

    #[test]
    fn sibling_chain_links_in_document_order() {
        let doc = parse(r#"<svg><rect/><circle/></svg>"#).unwrap();
        let root = doc.root;
        let first = doc.children(root).next().unwrap();
        let second = doc.node(first).next;
        assert_eq!(doc.node(second).element, Element::Circle);
    }

    #[test]
    fn style_attribute_splits_into_presentation_attrs() {
        let doc = parse(r#"<svg><rect style="fill:red; stroke: blue"/></svg>"#).unwrap();
        let rect = doc.node(doc.children(doc.root).next().unwrap());
        assert_eq!(rect.attr.fill.rgb, 0xff0000);
        assert_eq!(rect.attr.stroke.rgb, 0x0000ff);
    }

    #[test]
    fn path_d_attribute_populates_path_ops_and_points() {
        let doc = parse(r#"<svg><path d="M0 0 L10 10 Z"/></svg>"#).unwrap();
        let p = doc.node(doc.children(doc.root).next().unwrap());
        match &p.payload {
            Payload::Path(path) => assert_eq!(path.op_count, 3),
            _ => panic!("expected path payload"),
        }
    }

    #[test]
    fn unknown_elements_are_skipped_without_corrupting_the_stack() {
        let doc = parse(r#"<svg><metadata><x/></metadata><rect/></svg>"#).unwrap();
        let children: Vec<_> = doc.children(doc.root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node(children[0]).element, Element::Rect);
    }
}
