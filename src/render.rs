//! Rendering: turn a layout into an SVG drawing or a terminal diagram.

use std::fmt::Write;

use crate::layout::{Layout, Point};
use crate::model::{Graph, Theme};

/// How a layout should be drawn.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,

    /// Branch whose commits are drawn enlarged and filled.
    pub highlight: Option<String>,
}

struct Palette {
    background: &'static str,
    node_fill: &'static str,
    id_text: &'static str,
    message_text: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: "#ffffff",
                node_fill: "#ffffff",
                id_text: "#333333",
                message_text: "#666666",
            },
            Theme::Dark => Self {
                background: "#1f2937",
                node_fill: "#111827",
                id_text: "#e5e7eb",
                message_text: "#9ca3af",
            },
        }
    }
}

/// Draw the layout as a standalone SVG document.
pub fn render_svg(layout: &Layout, options: &RenderOptions) -> String {
    let palette = Palette::for_theme(options.theme);
    let mut svg = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = layout.width,
        h = layout.height,
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        palette.background
    );

    for path in &layout.paths {
        let color = path.kind.color();
        let _ = writeln!(svg, r#"  <g class="branch" data-branch="{}">"#, escape(&path.name));
        line(&mut svg, path.fork, path.lane_start, color, false);
        if path.closed {
            line(&mut svg, path.lane_start, path.end, color, false);
        } else {
            line(&mut svg, path.lane_start, path.tip, color, false);
            line(&mut svg, path.tip, path.end, color, true);
        }
        let _ = writeln!(
            svg,
            r#"    <text x="{x}" y="{y}" text-anchor="middle" fill="{color}" font-weight="500" font-size="12" transform="rotate(-30, {x}, {y})">{name}</text>"#,
            x = path.label.x,
            y = path.label.y,
            name = escape(&path.name),
        );
        svg.push_str("  </g>\n");
    }

    for node in &layout.nodes {
        let color = node.kind.color();
        let highlighted = options.highlight.as_deref() == Some(node.branch.as_str());
        let (radius, fill) = if highlighted {
            (10, color)
        } else {
            (8, palette.node_fill)
        };
        let short_id: String = node.id.chars().take(7).collect();

        let _ = writeln!(svg, r#"  <g class="commit" data-position="{}">"#, node.position);
        let _ = writeln!(
            svg,
            r#"    <circle cx="{}" cy="{}" r="{radius}" fill="{fill}" stroke="{color}" stroke-width="2"/>"#,
            node.at.x, node.at.y,
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}" fill="{}" font-weight="500" font-size="12">{}</text>"#,
            node.at.x.saturating_add(15),
            node.at.y.saturating_sub(10),
            palette.id_text,
            escape(&short_id),
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}" fill="{}" font-size="11">{}</text>"#,
            node.at.x.saturating_add(15),
            node.at.y.saturating_add(5),
            palette.message_text,
            escape(&node.message),
        );
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

fn line(svg: &mut String, from: Point, to: Point, color: &str, dashed: bool) {
    if from == to {
        return;
    }
    let dash = if dashed { r#" stroke-dasharray="4""# } else { "" };
    let _ = writeln!(
        svg,
        r#"    <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="2"{dash}/>"#,
        from.x, from.y, to.x, to.y,
    );
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Draw the graph as rows of lane glyphs for a terminal.
///
/// One row per position: `*` marks the commit, `|` a lane that is live at
/// that row. Lanes follow the layout's ordering.
pub fn render_text(graph: &Graph, layout: &Layout) -> String {
    let mut out = String::new();

    for path in &layout.paths {
        let merged = graph.branch(&path.name).is_some_and(|b| b.is_closed());
        let _ = writeln!(
            out,
            "  [{}] {}{}",
            path.lane,
            path.name,
            if merged { " (merged)" } else { "" }
        );
    }
    out.push('\n');

    let mut nodes: Vec<_> = layout.nodes.iter().collect();
    nodes.sort_by_key(|n| n.position);

    for node in nodes {
        let lanes: String = graph
            .branches
            .iter()
            .map(|b| {
                if b.name == node.branch {
                    '*'
                } else if b.spans(node.position) {
                    '|'
                } else {
                    ' '
                }
            })
            .flat_map(|glyph| [glyph, ' '])
            .collect();
        let short_id: String = node.id.chars().take(7).collect();
        let _ = writeln!(out, "  {lanes} {short_id}  {}", node.message);
    }

    out
}
