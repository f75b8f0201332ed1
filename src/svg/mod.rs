//! The SVG document model and its four serialization front ends: XML
//! text (parse + emit), an indented debug text dump, and two binary
//! encodings (vf128-packed floats and raw IEEE floats).

pub mod attr_text;
pub mod attrs;
pub mod color;
pub mod emit_binary;
pub mod emit_text;
pub mod emit_xml;
pub mod model;
pub mod parse_binary;
pub mod parse_xml;
pub mod path_data;
pub mod transform;
pub mod value;
pub mod xml;

pub use model::Document;
