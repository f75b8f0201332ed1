//! The SVG document model: an append-only arena of nodes, path
//! operations and points, linked by parent/next-sibling indices instead
//! of pointers.
//!
//! Indices use a sentinel of `-1` for "no node" rather than `Option`,
//! matching the arena's C original (`musvg_node_sentinel = -1`) — the
//! arena never frees a node, so a plain `i32` with one reserved value
//! is enough, and it is what every other module's binary/text
//! serialization of an index assumes.

use crate::svg::attrs::{
    Display, FillRule, GradientSpread, GradientUnit, LineCap, LineJoin,
};

/// An arena index. `NONE` (`-1`) stands in for "no node"/"no sibling".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeRef(pub i32);

impl NodeRef {
    pub const NONE: NodeRef = NodeRef(-1);

    pub fn is_none(self) -> bool {
        self.0 < 0
    }

    pub fn index(self) -> Option<usize> {
        if self.is_none() {
            None
        } else {
            Some(self.0 as usize)
        }
    }
}

impl From<usize> for NodeRef {
    fn from(i: usize) -> Self {
        NodeRef(i as i32)
    }
}

pub type Point = (f32, f32);

/// A flat scalar float arena shared by path-command arguments and
/// polyline/polygon coordinate lists. `point_offset`/`point_count` on
/// [`PathOp`] and [`PointsPayload`] count individual `f32`s here, not
/// `(x, y)` pairs — an elliptical-arc command's 7 args (`rx ry
/// x-axis-rotation large-arc sweep x y`) don't pair evenly, so the
/// original stores a flat float array rather than points proper.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub units: crate::svg::attrs::Unit,
}

impl Length {
    pub fn user(value: f32) -> Self {
        Length { value, units: crate::svg::attrs::Unit::User }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length { value: 0.0, units: crate::svg::attrs::Unit::Default }
    }
}

/// An RGB color with an explicit "was this attribute set" flag,
/// mirroring `musvg_color`'s `present` field — color attributes are
/// distinguished from "unset" independent of any sentinel RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub rgb: u32,
    pub present: bool,
}

impl Color {
    pub fn rgb(rgb: u32) -> Self {
        Color { rgb, present: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformKind {
    Matrix,
    Translate,
    Scale,
    Rotate,
    SkewX,
    SkewY,
}

/// A single transform-list entry plus its resolved 2x3 affine matrix
/// (`a b c d e f`, applied as `[[a, c, e], [b, d, f]]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub kind: TransformKind,
    pub args: [f32; 3],
    pub nargs: u8,
    pub matrix: [f32; 6],
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            kind: TransformKind::Matrix,
            args: [0.0; 3],
            nargs: 0,
            matrix: crate::svg::transform::IDENTITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashArray {
    pub dashes: [f32; 8],
    pub count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AspectRatio {
    pub align_x: crate::svg::attrs::Align,
    pub align_y: crate::svg::attrs::Align,
    pub crop: crate::svg::attrs::Crop,
}

/// A 64-byte fixed id/name buffer (`musvg_id`). Fixed capacity is part
/// of the wire format, not just an implementation detail: binary ids
/// are length-prefixed strings bounded by this size.
pub const ID_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Id(pub String);

impl Id {
    pub fn set(&mut self, s: &str) {
        self.0 = s.chars().take(ID_CAPACITY - 1).collect();
    }
}

/// Attributes common to every element, stored once per node regardless
/// of which of them the element type actually honors at render time —
/// same layout the original shares across all node kinds.
#[derive(Debug, Clone, Default)]
pub struct CommonAttrs {
    pub present: u64,
    pub id: Id,
    pub xform: Transform,
    pub fill: Color,
    pub stroke: Color,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
    pub stroke_miterlimit: f32,
    pub stroke_width: Length,
    pub stroke_dashoffset: Length,
    pub stroke_dasharray: DashArray,
    pub stroke_linejoin: LineJoin,
    pub stroke_linecap: LineCap,
    pub fill_rule: FillRule,
    pub display: Display,
    pub font_size: Length,
    pub stop_color: Color,
    pub stop_opacity: f32,
    pub stop_offset: Length,
}

impl CommonAttrs {
    pub fn is_set(&self, attr: crate::svg::attrs::Attr) -> bool {
        self.present & (1u64 << attr as u64) != 0
    }

    pub fn set(&mut self, attr: crate::svg::attrs::Attr) {
        self.present |= 1u64 << attr as u64;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgPayload {
    pub viewbox: ViewBox,
    pub aspectratio: AspectRatio,
    pub width: Length,
    pub height: Length,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathPayload {
    pub op_offset: u32,
    pub op_count: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectPayload {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
    pub rx: Length,
    pub ry: Length,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CirclePayload {
    pub cx: Length,
    pub cy: Length,
    pub r: Length,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EllipsePayload {
    pub cx: Length,
    pub cy: Length,
    pub rx: Length,
    pub ry: Length,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinePayload {
    pub x1: Length,
    pub y1: Length,
    pub x2: Length,
    pub y2: Length,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PointsPayload {
    pub point_offset: u32,
    pub point_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct GradientPayload {
    pub href: Id,
    pub xform: Transform,
    pub spread: GradientSpread,
    pub units: GradientUnit,
    /// `(x1,y1,x2,y2)` for a linear gradient, `(cx,cy,r,0)` + `fx,fy`
    /// for a radial one — callers read through [`Payload::LGradient`]/
    /// [`Payload::RGradient`] instead of this shared struct directly.
    pub a: Length,
    pub b: Length,
    pub c: Length,
    pub d: Length,
    pub e: Length,
}

#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    None,
    Svg(SvgPayload),
    Path(PathPayload),
    Rect(RectPayload),
    Circle(CirclePayload),
    Ellipse(EllipsePayload),
    Line(LinePayload),
    Polyline(PointsPayload),
    Polygon(PointsPayload),
    LGradient(GradientPayload),
    RGradient(GradientPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Element {
    #[default]
    None,
    Svg,
    G,
    Defs,
    Path,
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    LGradient,
    RGradient,
    Stop,
}

impl Element {
    pub const ALL: [Element; 14] = [
        Element::None, Element::Svg, Element::G, Element::Defs, Element::Path,
        Element::Rect, Element::Circle, Element::Ellipse, Element::Line,
        Element::Polyline, Element::Polygon, Element::LGradient, Element::RGradient,
        Element::Stop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Element::None => "",
            Element::Svg => "svg",
            Element::G => "g",
            Element::Defs => "defs",
            Element::Path => "path",
            Element::Rect => "rect",
            Element::Circle => "circle",
            Element::Ellipse => "ellipse",
            Element::Line => "line",
            Element::Polyline => "polyline",
            Element::Polygon => "polygon",
            Element::LGradient => "linearGradient",
            Element::RGradient => "radialGradient",
            Element::Stop => "stop",
        }
    }

    pub fn from_name(name: &str) -> Option<Element> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// The binary format's one-byte element id, matching declaration order.
    pub fn from_u8(v: u8) -> Option<Element> {
        Self::ALL.get(v as usize).copied()
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub element: Element,
    pub next: NodeRef,
    pub parent: NodeRef,
    pub attr: CommonAttrs,
    pub payload: Payload,
}

impl Node {
    pub fn new(element: Element, parent: NodeRef) -> Self {
        Node {
            element,
            next: NodeRef::NONE,
            parent,
            attr: CommonAttrs::default(),
            payload: Payload::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathOp {
    pub code: crate::svg::attrs::PathOpcode,
    pub point_offset: u32,
    pub point_count: u32,
}

/// The owning arena: every node, path operation and point produced by
/// either front end (XML or binary) lives here, and every emitter reads
/// from here. Nothing is ever removed once appended.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub path_ops: Vec<PathOp>,
    pub points: Vec<f32>,
    /// Index of the root `<svg>` node, or `NONE` for an empty document.
    pub root: NodeRef,
}

impl Document {
    pub fn new() -> Self {
        Document { root: NodeRef::NONE, ..Default::default() }
    }

    pub fn push_node(&mut self, node: Node) -> NodeRef {
        let idx = self.nodes.len();
        self.nodes.push(node);
        NodeRef::from(idx)
    }

    pub fn node(&self, r: NodeRef) -> &Node {
        &self.nodes[r.index().expect("dereferenced NodeRef::NONE")]
    }

    pub fn node_mut(&mut self, r: NodeRef) -> &mut Node {
        &mut self.nodes[r.index().expect("dereferenced NodeRef::NONE")]
    }

    pub fn children(&self, parent: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == parent)
            .map(|(i, _)| NodeRef::from(i))
    }

    /// Appends a run of scalars to the point arena, returning
    /// `(offset, count)` for the pushed run.
    pub fn push_floats(&mut self, vals: &[f32]) -> (u32, u32) {
        let offset = self.points.len() as u32;
        self.points.extend_from_slice(vals);
        (offset, vals.len() as u32)
    }

    pub fn floats(&self, offset: u32, count: u32) -> &[f32] {
        &self.points[offset as usize..(offset + count) as usize]
    }

    pub fn push_path_ops(&mut self, ops: &[PathOp]) -> (u32, u32) {
        let offset = self.path_ops.len() as u32;
        self.path_ops.extend_from_slice(ops);
        (offset, ops.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ref_sentinel_round_trips() {
        assert!(NodeRef::NONE.is_none());
        assert_eq!(NodeRef::NONE.index(), None);
        assert_eq!(NodeRef::from(3usize).index(), Some(3));
    }

    #[test]
    fn arena_links_children_by_parent_index() {
        let mut doc = Document::new();
        let root = doc.push_node(Node::new(Element::Svg, NodeRef::NONE));
        let a = doc.push_node(Node::new(Element::Rect, root));
        let b = doc.push_node(Node::new(Element::Circle, root));
        let kids: Vec<_> = doc.children(root).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn presence_bitmap_tracks_set_attributes() {
        let mut attr = CommonAttrs::default();
        assert!(!attr.is_set(crate::svg::attrs::Attr::Fill));
        attr.set(crate::svg::attrs::Attr::Fill);
        assert!(attr.is_set(crate::svg::attrs::Attr::Fill));
        assert!(!attr.is_set(crate::svg::attrs::Attr::Stroke));
    }
}
