//! Serializes a rendered frame as a standalone SVG document.

use std::fmt::Write;

use crate::render::path::{CoordFormat, Fill, PathDescriptor};
use crate::render::{Quality, Surface};

/// Escapes the characters that may not appear inside a quoted attribute.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"{}\"", escape(value));
}

fn number_attr(out: &mut String, name: &str, value: f32) {
    attr(out, name, &CoordFormat::default().format(value));
}

fn write_path(out: &mut String, path: &PathDescriptor, quality: Quality) {
    out.push_str("  <path");
    attr(out, "d", &path.commands);

    let style = &path.style;
    match &style.fill {
        Fill::None => attr(out, "fill", "none"),
        Fill::Color(color) => attr(out, "fill", color),
    }
    if let Some(opacity) = style.fill_opacity {
        number_attr(out, "fill-opacity", opacity);
    }
    if let Some(stroke) = &style.stroke {
        attr(out, "stroke", stroke);
    }
    if let Some(opacity) = style.stroke_opacity {
        number_attr(out, "stroke-opacity", opacity);
    }
    if let Some(width) = style.stroke_width {
        number_attr(out, "stroke-width", width);
    }
    if let Some((dash, gap)) = style.stroke_dasharray {
        let f = CoordFormat::default();
        attr(out, "stroke-dasharray", &format!("{},{}", f.format(dash), f.format(gap)));
    }
    if let Some(transform) = &path.transform {
        attr(out, "transform", transform);
    }
    if quality == Quality::Low {
        attr(out, "shape-rendering", "crispEdges");
    }
    out.push_str("/>\n");
}

/// Builds the document: a root sized to the surface with a centered view
/// box, an optional background rectangle, then every path in order.
pub fn write_document(surface: &Surface, paths: &[PathDescriptor], quality: Quality) -> String {
    let mut out = String::new();
    out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\"");
    number_attr(&mut out, "width", surface.width);
    number_attr(&mut out, "height", surface.height);
    attr(&mut out, "viewBox", &surface.view_box());
    out.push_str(">\n");

    if let Some(background) = &surface.background {
        out.push_str("  <rect");
        number_attr(&mut out, "x", -surface.width / 2.0);
        number_attr(&mut out, "y", -surface.height / 2.0);
        number_attr(&mut out, "width", surface.width);
        number_attr(&mut out, "height", surface.height);
        attr(&mut out, "fill", background);
        if let Some(opacity) = surface.background_opacity {
            number_attr(&mut out, "fill-opacity", opacity);
        }
        out.push_str("/>\n");
    }

    for path in paths {
        write_path(&mut out, path, quality);
    }
    out.push_str("</svg>\n");
    out
}
