//! Small vector previews of a definition, returned as an inline data URI.

use crate::process::{NodeType, ProcessDefinition, ProcessNode};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::fmt::Write as _;

pub const DEFAULT_WIDTH: u32 = 200;
pub const DEFAULT_HEIGHT: u32 = 150;

const PADDING: f64 = 20.0;
// Node footprint in graph units, matching the editor's default node size.
const NODE_WIDTH: f64 = 100.0;
const NODE_HEIGHT: f64 = 80.0;

fn fill(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Start => "#52c41a",
        NodeType::End => "#ff4d4f",
        NodeType::UserTask => "#1890ff",
        NodeType::ServiceTask => "#722ed1",
        NodeType::Gateway => "#faad14",
    }
}

/// Renders `definition` to an SVG of `width` x `height` pixels and encodes it
/// as `data:image/svg+xml;base64,...`.
///
/// The view box is fitted to the node bounds plus padding; an empty definition
/// yields a blank canvas.
pub fn generate_thumbnail(definition: &ProcessDefinition, width: u32, height: u32) -> String {
    let svg = render_svg(definition, width, height);
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

pub fn render_svg(definition: &ProcessDefinition, width: u32, height: u32) -> String {
    let (min_x, min_y, view_w, view_h) = view_box(&definition.nodes);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}" preserveAspectRatio="xMidYMid meet">"##,
        width, height, min_x, min_y, view_w, view_h
    );
    let _ = write!(
        svg,
        r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff"/>"##,
        min_x, min_y, view_w, view_h
    );

    for flow in &definition.flows {
        let (Some(from), Some(to)) = (definition.node(&flow.from), definition.node(&flow.to))
        else {
            continue;
        };
        let (x1, y1) = centre(from);
        let (x2, y2) = centre(to);
        let _ = write!(
            svg,
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#8c8c8c" stroke-width="2"/>"##,
            x1, y1, x2, y2
        );
    }

    for node in &definition.nodes {
        shape(&mut svg, node);
    }

    svg.push_str("</svg>");
    svg
}

fn shape(svg: &mut String, node: &ProcessNode) {
    let color = fill(node.node_type());
    let (cx, cy) = centre(node);
    let _ = match node.node_type() {
        NodeType::Start | NodeType::End => write!(
            svg,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            cx,
            cy,
            NODE_HEIGHT / 2.0,
            color
        ),
        NodeType::Gateway => write!(
            svg,
            r#"<polygon points="{},{} {},{} {},{} {},{}" fill="{}"/>"#,
            cx,
            node.y,
            node.x + NODE_WIDTH,
            cy,
            cx,
            node.y + NODE_HEIGHT,
            node.x,
            cy,
            color
        ),
        NodeType::UserTask | NodeType::ServiceTask => write!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="8" fill="{}"/>"#,
            node.x, node.y, NODE_WIDTH, NODE_HEIGHT, color
        ),
    };
}

fn centre(node: &ProcessNode) -> (f64, f64) {
    (node.x + NODE_WIDTH / 2.0, node.y + NODE_HEIGHT / 2.0)
}

fn view_box(nodes: &[ProcessNode]) -> (f64, f64, f64, f64) {
    if nodes.is_empty() {
        return (0.0, 0.0, f64::from(DEFAULT_WIDTH), f64::from(DEFAULT_HEIGHT));
    }
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node in nodes {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + NODE_WIDTH);
        max_y = max_y.max(node.y + NODE_HEIGHT);
    }
    (
        min_x - PADDING,
        min_y - PADDING,
        max_x - min_x + 2.0 * PADDING,
        max_y - min_y + 2.0 * PADDING,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessFlow;

    #[test]
    fn view_box_fits_nodes_with_padding() {
        let definition = ProcessDefinition::new(
            vec![
                ProcessNode::new("s", NodeType::Start, "Start"),
                ProcessNode::new("e", NodeType::End, "End").at(300.0, 100.0),
            ],
            vec![ProcessFlow::new("f", "s", "e")],
        );
        let svg = render_svg(&definition, 200, 150);
        assert!(svg.contains(r#"viewBox="-20 -20 440 220""#));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
    }

    #[test]
    fn output_is_a_base64_svg_data_uri() {
        let uri = generate_thumbnail(&ProcessDefinition::default(), 120, 90);
        let payload = uri
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("data uri prefix");
        let decoded = BASE64.decode(payload).expect("valid base64");
        let svg = String::from_utf8(decoded).expect("utf-8");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="120" height="90""#));
    }
}
