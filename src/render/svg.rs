//! Static SVG export of a single [`Frame`].
//!
//! ```text
//! Scene → project() → Frame → write_svg() → <svg> document
//! ```
//!
//! Layers are drawn back to front: mesh links, nodes, beams.

use std::io::Write;

use super::Frame;
use crate::Result;

pub const CANVAS_SIZE: f64 = 600.0;

const BEAM_COLOR: &str = "#00ff9d";
const BEAM_GLOW: &str = "#22d3aa";
const RUST: &str = "#ea580c";
const HULL_FILL: &str = "#0f172a";
const LABEL_IDLE: &str = "#475569";

/// Hexagon outline in a 100×116 viewbox, centred on (50, 58).
const HEX_PATH: &str = "M50 0L93.3013 25V75L50 100L6.69873 75V25L50 0Z";

/// Write `frame` as a standalone SVG document.
pub fn write_svg(frame: &Frame, writer: &mut dyn Write) -> Result<()> {
    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
        s = CANVAS_SIZE
    )?;
    writeln!(writer, "<!-- stage: {} t={}ms -->", frame.stage, frame.at)?;
    writeln!(writer, "<defs>")?;
    writeln!(writer, r#"  <linearGradient id="linkGradient" x1="0%" y1="0%" x2="100%" y2="0%">"#)?;
    writeln!(writer, r#"    <stop offset="0%" stop-color="{RUST}" stop-opacity="0.1"/>"#)?;
    writeln!(writer, r#"    <stop offset="50%" stop-color="{BEAM_COLOR}" stop-opacity="0.3"/>"#)?;
    writeln!(writer, r#"    <stop offset="100%" stop-color="{RUST}" stop-opacity="0.1"/>"#)?;
    writeln!(writer, "  </linearGradient>")?;
    writeln!(writer, "</defs>")?;

    writeln!(writer, r#"<g id="mesh">"#)?;
    for e in &frame.edges {
        writeln!(
            writer,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="url(#linkGradient)" stroke-width="{}"/>"#,
            e.from.x, e.from.y, e.to.x, e.to.y, e.stroke_width
        )?;
    }
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g id="nodes">"#)?;
    for n in &frame.nodes {
        // 80 px wide hull at scale 1, viewbox is 100 wide.
        let k = 0.8 * n.scale;
        let (tx, ty) = (n.screen.x - 50.0 * k, n.screen.y - 58.0 * k);
        let core = if n.lit { BEAM_COLOR } else { RUST };
        writeln!(writer, r#"  <g transform="translate({tx:.2} {ty:.2}) scale({k:.3})">"#)?;
        writeln!(
            writer,
            r#"    <path d="{HEX_PATH}" fill="{HULL_FILL}" stroke="{RUST}" stroke-width="2" opacity="0.5"/>"#
        )?;
        writeln!(
            writer,
            r#"    <path d="{HEX_PATH}" fill="{core}" transform="translate(30 35) scale(0.4)"/>"#
        )?;
        writeln!(writer, "  </g>")?;
        if n.show_label {
            let color = if n.lit { BEAM_COLOR } else { LABEL_IDLE };
            writeln!(
                writer,
                r#"  <text x="{:.2}" y="{:.2}" fill="{color}" font-family="monospace" font-size="9" text-anchor="middle">{}</text>"#,
                n.screen.x,
                n.screen.y + 40.0 * n.scale + 12.0,
                n.label
            )?;
        }
    }
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g id="beams">"#)?;
    for p in &frame.pulses {
        let (a, b) = (p.line_from, p.line_to);
        writeln!(
            writer,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{BEAM_GLOW}" stroke-width="3" stroke-opacity="{:.3}" stroke-linecap="round"/>"#,
            a.x, a.y, b.x, b.y, p.glow_opacity
        )?;
        writeln!(
            writer,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{BEAM_COLOR}" stroke-width="1.5" stroke-opacity="{:.3}" stroke-linecap="round"/>"#,
            a.x, a.y, b.x, b.y, p.core_opacity
        )?;
        writeln!(
            writer,
            r#"  <circle r="6" fill="{BEAM_GLOW}" opacity="{:.3}" cx="{:.2}" cy="{:.2}"/>"#,
            p.dot_opacity, p.screen.x, p.screen.y
        )?;
        writeln!(
            writer,
            r##"  <circle r="3" fill="#ffffff" opacity="{:.3}" cx="{:.2}" cy="{:.2}"/>"##,
            p.dot_core_opacity, p.screen.x, p.screen.y
        )?;
    }
    writeln!(writer, "</g>")?;
    writeln!(writer, "</svg>")?;
    Ok(())
}

/// Render a frame to an SVG string.
pub fn to_svg_string(frame: &Frame) -> Result<String> {
    let mut buf = Vec::new();
    write_svg(frame, &mut buf)?;
    String::from_utf8(buf).map_err(|e| crate::Error::Render(e.to_string()))
}
