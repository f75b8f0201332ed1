//! Attribute identifiers, the small enumerated value types, named
//! colors, and path opcodes.
//!
//! `Attr` enumerates every attribute the format knows about, in the
//! same order as the source enum (its variants double as presence-
//! bitmap bit indices and as the binary-format's attribute byte).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum Attr {
    None = 0,
    Display,
    Fill,
    FillOpacity,
    FillRule,
    FontSize,
    Id,
    Offset,
    StopColor,
    StopOpacity,
    Stroke,
    StrokeWidth,
    StrokeDasharray,
    StrokeDashoffset,
    StrokeOpacity,
    StrokeLinecap,
    StrokeLinejoin,
    StrokeMiterlimit,
    Style,
    Transform,
    SvgWidth,
    SvgHeight,
    SvgViewbox,
    SvgAspectratio,
    PathD,
    PolyPoints,
    RectX,
    RectY,
    RectWidth,
    RectHeight,
    RectRx,
    RectRy,
    CircleCx,
    CircleCy,
    CircleR,
    EllipseCx,
    EllipseCy,
    EllipseRx,
    EllipseRy,
    LineX1,
    LineY1,
    LineX2,
    LineY2,
    LGradientX1,
    LGradientY1,
    LGradientX2,
    LGradientY2,
    RGradientCx,
    RGradientCy,
    RGradientR,
    RGradientFx,
    RGradientFy,
    GradientUnits,
    GradientTransform,
    GradientSpread,
    GradientHref,
}

impl Attr {
    pub const LIMIT: u64 = Attr::GradientHref as u64;

    /// Every variant in declaration order, matching the binary format's
    /// one-byte attribute id.
    const ALL: [Attr; 56] = {
        use Attr::*;
        [
            None, Display, Fill, FillOpacity, FillRule, FontSize, Id, Offset, StopColor,
            StopOpacity, Stroke, StrokeWidth, StrokeDasharray, StrokeDashoffset, StrokeOpacity,
            StrokeLinecap, StrokeLinejoin, StrokeMiterlimit, Style, Transform, SvgWidth,
            SvgHeight, SvgViewbox, SvgAspectratio, PathD, PolyPoints, RectX, RectY, RectWidth,
            RectHeight, RectRx, RectRy, CircleCx, CircleCy, CircleR, EllipseCx, EllipseCy,
            EllipseRx, EllipseRy, LineX1, LineY1, LineX2, LineY2, LGradientX1, LGradientY1,
            LGradientX2, LGradientY2, RGradientCx, RGradientCy, RGradientR, RGradientFx,
            RGradientFy, GradientUnits, GradientTransform, GradientSpread, GradientHref,
        ]
    };

    pub fn from_u8(v: u8) -> Option<Attr> {
        Self::ALL.get(v as usize).copied()
    }

    /// The XML attribute name, e.g. `"stroke-width"`. A handful of
    /// names (`"width"`, `"height"`, `"cx"`, `"cy"`, `"x1"`, `"y1"`,
    /// `"x2"`, `"y2"`, `"r"`) are reused verbatim across element kinds
    /// — which attribute a given name resolves to depends on the
    /// current element, so parsing dispatches on `(element, name)`,
    /// not name alone.
    pub fn xml_name(self) -> &'static str {
        use Attr::*;
        match self {
            None => "",
            Display => "display",
            Fill => "fill",
            FillOpacity => "fill-opacity",
            FillRule => "fill-rule",
            FontSize => "font-size",
            Id => "id",
            Offset => "offset",
            StopColor => "stop-color",
            StopOpacity => "stop-opacity",
            Stroke => "stroke",
            StrokeWidth => "stroke-width",
            StrokeDasharray => "stroke-dasharray",
            StrokeDashoffset => "stroke-dashoffset",
            StrokeOpacity => "stroke-opacity",
            StrokeLinecap => "stroke-linecap",
            StrokeLinejoin => "stroke-linejoin",
            StrokeMiterlimit => "stroke-miterlimit",
            Style => "style",
            Transform => "transform",
            SvgWidth | RectWidth => "width",
            SvgHeight | RectHeight => "height",
            SvgViewbox => "viewBox",
            SvgAspectratio => "preserveAspectRatio",
            PathD => "d",
            PolyPoints => "points",
            RectX => "x",
            RectY => "y",
            CircleCx | EllipseCx | RGradientCx => "cx",
            CircleCy | EllipseCy | RGradientCy => "cy",
            RectRx | EllipseRx => "rx",
            RectRy | EllipseRy => "ry",
            CircleR | RGradientR => "r",
            LineX1 | LGradientX1 => "x1",
            LineY1 | LGradientY1 => "y1",
            LineX2 | LGradientX2 => "x2",
            LineY2 | LGradientY2 => "y2",
            RGradientFx => "fx",
            RGradientFy => "fy",
            GradientUnits => "gradientUnits",
            GradientTransform => "gradientTransform",
            GradientSpread => "spreadMethod",
            GradientHref => "xlink:href",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Default,
    Butt,
    Round,
    Square,
}
impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}
impl LineCap {
    pub const LIMIT: usize = 3;
    pub fn name(self) -> &'static str {
        match self {
            LineCap::Default => "",
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "butt" => LineCap::Butt,
            "round" => LineCap::Round,
            "square" => LineCap::Square,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Default,
    Miter,
    Round,
    Bevel,
}
impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter
    }
}
impl LineJoin {
    pub const LIMIT: usize = 3;
    pub fn name(self) -> &'static str {
        match self {
            LineJoin::Default => "",
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "miter" => LineJoin::Miter,
            "round" => LineJoin::Round,
            "bevel" => LineJoin::Bevel,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    Default,
    Nonzero,
    Evenodd,
}
impl Default for FillRule {
    fn default() -> Self {
        FillRule::Nonzero
    }
}
impl FillRule {
    pub const LIMIT: usize = 2;
    pub fn name(self) -> &'static str {
        match self {
            FillRule::Default => "",
            FillRule::Nonzero => "nonzero",
            FillRule::Evenodd => "evenodd",
        }
    }
    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "nonzero" => FillRule::Nonzero,
            "evenodd" => FillRule::Evenodd,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Default,
    User,
    Px,
    Pt,
    Pc,
    Mm,
    Cm,
    In,
    Percent,
    Em,
    Ex,
}
impl Default for Unit {
    fn default() -> Self {
        Unit::User
    }
}
impl Unit {
    pub const LIMIT: usize = 10;
    pub fn name(self) -> &'static str {
        match self {
            Unit::Default | Unit::User => "",
            Unit::Px => "px",
            Unit::Pt => "pt",
            Unit::Pc => "pc",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Percent => "%",
            Unit::Em => "em",
            Unit::Ex => "ex",
        }
    }
    pub fn from_suffix(s: &str) -> Self {
        match s {
            "px" => Unit::Px,
            "pt" => Unit::Pt,
            "pc" => Unit::Pc,
            "mm" => Unit::Mm,
            "cm" => Unit::Cm,
            "in" => Unit::In,
            "%" => Unit::Percent,
            "em" => Unit::Em,
            "ex" => Unit::Ex,
            _ => Unit::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Default,
    Inline,
    None,
}
impl Default for Display {
    fn default() -> Self {
        Display::Inline
    }
}
impl Display {
    pub const LIMIT: usize = 2;
    pub fn name(self) -> &'static str {
        match self {
            Display::Default => "",
            Display::Inline => "inline",
            Display::None => "none",
        }
    }
    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "inline" => Display::Inline,
            "none" => Display::None,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Default,
    None,
    Min,
    Mid,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crop {
    #[default]
    Default,
    None,
    Meet,
    Slice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientSpread {
    Default,
    Pad,
    Reflect,
    Repeat,
}
impl Default for GradientSpread {
    fn default() -> Self {
        GradientSpread::Pad
    }
}
impl GradientSpread {
    pub const LIMIT: usize = 3;
    pub fn name(self) -> &'static str {
        match self {
            GradientSpread::Default => "",
            GradientSpread::Pad => "pad",
            GradientSpread::Reflect => "reflect",
            GradientSpread::Repeat => "repeat",
        }
    }
    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "pad" => GradientSpread::Pad,
            "reflect" => GradientSpread::Reflect,
            "repeat" => GradientSpread::Repeat,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientUnit {
    Default,
    User,
    ObjectBoundingBox,
}
impl Default for GradientUnit {
    fn default() -> Self {
        GradientUnit::User
    }
}
impl GradientUnit {
    pub const LIMIT: usize = 2;
    pub fn name(self) -> &'static str {
        match self {
            GradientUnit::Default => "",
            GradientUnit::User => "userSpaceOnUse",
            GradientUnit::ObjectBoundingBox => "objectBoundingBox",
        }
    }
    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "userSpaceOnUse" => GradientUnit::User,
            "objectBoundingBox" => GradientUnit::ObjectBoundingBox,
            _ => return None,
        })
    }
}

/// SVG path commands from the `d` attribute. `musvg_path_none` (0)
/// is a reserved non-value, same as every other `_none` variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathOpcode {
    #[default]
    None,
    ClosePath,
    MovetoAbs,
    MovetoRel,
    LinetoAbs,
    LinetoRel,
    CurvetoCubicAbs,
    CurvetoCubicRel,
    QuadraticCurveToAbs,
    QuadraticCurveToRel,
    EllipticalArcAbs,
    EllipticalArcRel,
    LineToHorizontalAbs,
    LineToHorizontalRel,
    LineToVerticalAbs,
    LineToVerticalRel,
    CurvetoCubicSmoothAbs,
    CurvetoCubicSmoothRel,
    CurvetoQuadraticSmoothAbs,
    CurvetoQuadraticSmoothRel,
}

impl PathOpcode {
    pub const LIMIT: usize = 19;

    /// Number of `f32` arguments the opcode consumes, indexed the same
    /// way as the source's `musvg_path_opcode_arg_count` table.
    pub fn arg_count(self) -> usize {
        const COUNTS: [usize; 20] =
            [0, 0, 2, 2, 2, 2, 6, 6, 4, 4, 7, 7, 1, 1, 1, 1, 4, 4, 2, 2];
        COUNTS[self as usize]
    }

    pub fn cmd_char(self) -> char {
        use PathOpcode::*;
        match self {
            None => '\0',
            ClosePath => 'Z',
            MovetoAbs => 'M',
            MovetoRel => 'm',
            LinetoAbs => 'L',
            LinetoRel => 'l',
            CurvetoCubicAbs => 'C',
            CurvetoCubicRel => 'c',
            QuadraticCurveToAbs => 'Q',
            QuadraticCurveToRel => 'q',
            EllipticalArcAbs => 'A',
            EllipticalArcRel => 'a',
            LineToHorizontalAbs => 'H',
            LineToHorizontalRel => 'h',
            LineToVerticalAbs => 'V',
            LineToVerticalRel => 'v',
            CurvetoCubicSmoothAbs => 'S',
            CurvetoCubicSmoothRel => 's',
            CurvetoQuadraticSmoothAbs => 'T',
            CurvetoQuadraticSmoothRel => 't',
        }
    }

    pub fn from_cmd_char(c: char) -> Option<Self> {
        use PathOpcode::*;
        Some(match c {
            'Z' | 'z' => ClosePath,
            'M' => MovetoAbs,
            'm' => MovetoRel,
            'L' => LinetoAbs,
            'l' => LinetoRel,
            'C' => CurvetoCubicAbs,
            'c' => CurvetoCubicRel,
            'Q' => QuadraticCurveToAbs,
            'q' => QuadraticCurveToRel,
            'A' => EllipticalArcAbs,
            'a' => EllipticalArcRel,
            'H' => LineToHorizontalAbs,
            'h' => LineToHorizontalRel,
            'V' => LineToVerticalAbs,
            'v' => LineToVerticalRel,
            'S' => CurvetoCubicSmoothAbs,
            's' => CurvetoCubicSmoothRel,
            'T' => CurvetoQuadraticSmoothAbs,
            't' => CurvetoQuadraticSmoothRel,
            _ => return core::option::Option::None,
        })
    }

    pub fn from_index(i: usize) -> Option<Self> {
        const ALL: [PathOpcode; 20] = {
            use PathOpcode::*;
            [
                None, ClosePath, MovetoAbs, MovetoRel, LinetoAbs, LinetoRel,
                CurvetoCubicAbs, CurvetoCubicRel, QuadraticCurveToAbs, QuadraticCurveToRel,
                EllipticalArcAbs, EllipticalArcRel, LineToHorizontalAbs, LineToHorizontalRel,
                LineToVerticalAbs, LineToVerticalRel, CurvetoCubicSmoothAbs, CurvetoCubicSmoothRel,
                CurvetoQuadraticSmoothAbs, CurvetoQuadraticSmoothRel,
            ]
        };
        ALL.get(i).copied()
    }
}

/// `(name, 0xRRGGBB)` pairs from the SVG/CSS named-color table,
/// consulted by text-form color parsing before falling back to
/// `#rrggbb`/`rgb(...)` forms.
pub const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000), ("silver", 0xc0c0c0), ("gray", 0x808080), ("white", 0xffffff),
    ("maroon", 0x800000), ("red", 0xff0000), ("purple", 0x800080), ("fuchsia", 0xff00ff),
    ("green", 0x008000), ("lime", 0x00ff00), ("olive", 0x808000), ("yellow", 0xffff00),
    ("navy", 0x000080), ("blue", 0x0000ff), ("teal", 0x008080), ("aqua", 0x00ffff),
    ("orange", 0xffa500), ("aliceblue", 0xf0f8ff), ("antiquewhite", 0xfaebd7),
    ("aquamarine", 0x7fffd4), ("azure", 0xf0ffff), ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4), ("blanchedalmond", 0xffebcd), ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a), ("burlywood", 0xdeb887), ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00), ("chocolate", 0xd2691e), ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed), ("cornsilk", 0xfff8dc), ("crimson", 0xdc143c),
    ("cyan", 0x00ffff), ("darkblue", 0x00008b), ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b), ("darkgray", 0xa9a9a9), ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9), ("darkkhaki", 0xbdb76b), ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f), ("darkorange", 0xff8c00), ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000), ("darksalmon", 0xe9967a), ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b), ("darkslategray", 0x2f4f4f), ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1), ("darkviolet", 0x9400d3), ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff), ("dimgray", 0x696969), ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff), ("firebrick", 0xb22222), ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22), ("gainsboro", 0xdcdcdc), ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700), ("goldenrod", 0xdaa520), ("greenyellow", 0xadff2f),
    ("grey", 0x808080), ("honeydew", 0xf0fff0), ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c), ("indigo", 0x4b0082), ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c), ("lavender", 0xe6e6fa), ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00), ("lemonchiffon", 0xfffacd), ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080), ("lightcyan", 0xe0ffff), ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3), ("lightgreen", 0x90ee90), ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1), ("lightsalmon", 0xffa07a), ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa), ("lightslategray", 0x778899), ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de), ("lightyellow", 0xffffe0), ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6), ("magenta", 0xff00ff), ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd), ("mediumorchid", 0xba55d3), ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371), ("mediumslateblue", 0x7b68ee), ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc), ("mediumvioletred", 0xc71585), ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa), ("mistyrose", 0xffe4e1), ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead), ("oldlace", 0xfdf5e6), ("olivedrab", 0x6b8e23),
    ("orangered", 0xff4500), ("orchid", 0xda70d6), ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98), ("paleturquoise", 0xafeeee), ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5), ("peachpuff", 0xffdab9), ("peru", 0xcd853f),
    ("pink", 0xffc0cb), ("plum", 0xdda0dd), ("powderblue", 0xb0e0e6),
    ("rosybrown", 0xbc8f8f), ("royalblue", 0x4169e1), ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072), ("sandybrown", 0xf4a460), ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee), ("sienna", 0xa0522d), ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd), ("slategray", 0x708090), ("slategrey", 0x708090),
    ("snow", 0xfffafa), ("springgreen", 0x00ff7f), ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c), ("thistle", 0xd8bfd8), ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0), ("violet", 0xee82ee), ("wheat", 0xf5deb3),
    ("whitesmoke", 0xf5f5f5), ("yellowgreen", 0x9acd32), ("transparent", 0xffffff),
    ("none", 0x000000),
];

pub fn named_color(name: &str) -> Option<u32> {
    NAMED_COLORS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_arg_counts_match_cmd_grammar() {
        assert_eq!(PathOpcode::MovetoAbs.arg_count(), 2);
        assert_eq!(PathOpcode::CurvetoCubicAbs.arg_count(), 6);
        assert_eq!(PathOpcode::EllipticalArcAbs.arg_count(), 7);
        assert_eq!(PathOpcode::ClosePath.arg_count(), 0);
    }

    #[test]
    fn opcode_char_round_trips() {
        for i in 0..=PathOpcode::LIMIT {
            if let Some(op) = PathOpcode::from_index(i) {
                if op == PathOpcode::None {
                    continue;
                }
                assert_eq!(PathOpcode::from_cmd_char(op.cmd_char()), Some(op));
            }
        }
    }

    #[test]
    fn named_colors_resolve() {
        assert_eq!(named_color("red"), Some(0xff0000));
        assert_eq!(named_color("cornflowerblue"), Some(0x6495ed));
        assert_eq!(named_color("not-a-color"), None);
    }

    #[test]
    fn attr_xml_names_disambiguate_by_caller() {
        assert_eq!(Attr::RectX.xml_name(), "x");
        assert_eq!(Attr::CircleCx.xml_name(), "cx");
        assert_eq!(Attr::SvgWidth.xml_name(), "width");
        assert_eq!(Attr::RectWidth.xml_name(), "width");
        assert_eq!(Attr::GradientHref.xml_name(), "xlink:href");
    }
}
