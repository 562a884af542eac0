//! DOT emission
//!
//! Converts a [`Graph`] into Graphviz source. Frames and objects are drawn as
//! `shape=none` nodes carrying HTML-like table labels, so every slot can be a
//! port. Layout runs left to right: the frame block takes the first rank and
//! objects flow rightward from it.
//!
//! Port names are synthetic (`f<frame>_<slot>` for frame slots, `p<n>` for
//! object slots, `in` for the entry port of every object), and all label text
//! is HTML-escaped, so nothing from the debugged program ends up inside an
//! identifier.

use crate::graph::palette::DEFAULT_PALETTE;
use crate::graph::{Edge, FrameBlock, Graph, Grid, ObjectNode, Slot, SlotRef, ValueKind};
use crate::memory::value::ObjectId;
use rustc_hash::FxHashMap;

/// Raster density in dots per inch
pub const DPI: u32 = 100;

const TEXT_SIZE: &str = "13";
const CLASS_SIZE: &str = "9"; // Frame names and type names
const ARROW_SIZE: &str = "0.7";
const FRAME_SLOT_WIDTH: u32 = 80;
const OBJECT_SLOT_WIDTH: u32 = 10;
const PLACEHOLDER_WIDTH: u32 = 3;

/// Name of the node holding all frames
pub const FRAMES_NODE: &str = "frames";

/// Entry port every incoming edge lands on
pub const ENTRY_PORT: &str = "in";

/// Render `graph` as DOT source.
///
/// When `size` (in pixels) is given, the layout is compressed to fit within
/// it while keeping its aspect ratio; otherwise it renders at natural size.
pub fn to_dot(graph: &Graph, size: Option<(u32, u32)>) -> String {
    let mut out = String::from("digraph \"graph\" {\n");
    out.push_str(&format!("\tgraph [dpi={} rankdir=LR]\n", DPI));
    if let Some((width, height)) = size {
        out.push_str(&format!(
            "\tgraph [ratio=compress size=\"{},{}\"]\n",
            width as f64 / DPI as f64,
            height as f64 / DPI as f64
        ));
    }

    out.push_str(&format!(
        "\t{} [label={} shape=none]\n",
        FRAMES_NODE,
        frames_label(&graph.frames)
    ));

    for node in &graph.nodes {
        out.push_str(&format!(
            "\t{} [label={} shape=none]\n",
            node_name(node.id),
            object_label(node)
        ));
    }

    let kinds: FxHashMap<ObjectId, ValueKind> =
        graph.nodes.iter().map(|node| (node.id, node.kind)).collect();
    for edge in &graph.edges {
        out.push_str(&format!(
            "\t{} -> {} [arrowsize={}]\n",
            edge_tail(edge, &kinds),
            edge_head(edge),
            ARROW_SIZE
        ));
    }

    out.push_str("}\n");
    out
}

/// DOT node name for an object
pub fn node_name(id: ObjectId) -> String {
    format!("obj_{}", id)
}

/// Port name of a frame slot
pub fn frame_port(frame: usize, slot: usize) -> String {
    format!("f{}_{}", frame, slot)
}

fn edge_tail(edge: &Edge, kinds: &FxHashMap<ObjectId, ValueKind>) -> String {
    match edge.from {
        SlotRef::Frame { frame, slot } => {
            format!("{}:{}", FRAMES_NODE, frame_port(frame, slot))
        }
        SlotRef::Object { owner, port } => {
            // Sequences hang their elements below, mappings to the right
            let compass = match kinds.get(&owner) {
                Some(ValueKind::Sequence { .. }) => ":s",
                Some(ValueKind::Mapping) | Some(ValueKind::MultiDimArray) => ":e",
                _ => "",
            };
            format!("{}:p{}{}", node_name(owner), port.0, compass)
        }
    }
}

fn edge_head(edge: &Edge) -> String {
    match edge.from {
        SlotRef::Frame { .. } => format!("{}:{}:w", node_name(edge.to), ENTRY_PORT),
        SlotRef::Object { .. } => format!("{}:{}", node_name(edge.to), ENTRY_PORT),
    }
}

fn frames_label(frames: &[FrameBlock]) -> String {
    let mut label = format!(
        "<<font point-size=\"{}\"><table cellpadding=\"0\" cellspacing=\"0\" border=\"0\">",
        TEXT_SIZE
    );
    if frames.is_empty() {
        // An empty table is not a valid label
        label.push_str(&format!(
            "<tr><td width=\"{}\">&nbsp;</td></tr>",
            FRAME_SLOT_WIDTH
        ));
    }
    for (frame_index, frame) in frames.iter().enumerate() {
        label.push_str(&format!(
            "<tr><td align=\"left\"><font point-size=\"{}\">{}</font></td></tr>",
            CLASS_SIZE,
            escape_html(&frame.name)
        ));
        for (slot_index, slot) in frame.slots.iter().enumerate() {
            let port = match slot.port {
                Some(_) => format!(" port=\"{}\"", frame_port(frame_index, slot_index)),
                None => String::new(),
            };
            label.push_str(&format!(
                "<tr><td border=\"1\" width=\"{}\" bgcolor=\"{}\"{}>{}</td></tr>",
                FRAME_SLOT_WIDTH,
                DEFAULT_PALETTE.frame,
                port,
                cell_text(&slot.label)
            ));
        }
        // Spacer between frames
        label.push_str(&format!(
            "<tr><td width=\"{}\">&nbsp;</td></tr>",
            FRAME_SLOT_WIDTH
        ));
    }
    label.push_str("</table></font>>");
    label
}

fn object_label(node: &ObjectNode) -> String {
    let mut label = format!(
        "<<font point-size=\"{}\"><table cellpadding=\"0\" cellspacing=\"0\" border=\"0\">\
         <tr><td align=\"left\"><font point-size=\"{}\">{}</font></td></tr>",
        TEXT_SIZE,
        CLASS_SIZE,
        escape_html(&node.type_name)
    );
    label.push_str(&format!(
        "<tr><td><table cellpadding=\"0\" cellspacing=\"0\" border=\"0\" port=\"{}\">",
        ENTRY_PORT
    ));

    let color = node.kind.color();
    match node.kind {
        ValueKind::Sequence { .. } => {
            // Elements side by side
            label.push_str("<tr>");
            for slot in &node.slots {
                label.push_str(&object_cell(slot, color));
            }
            label.push_str("</tr>");
        }
        ValueKind::MultiDimArray => {
            if let Some((header, rest)) = node.slots.split_first() {
                label.push_str(&format!("<tr>{}</tr>", object_cell(header, color)));
                if let Some(grid) = &node.preview {
                    label.push_str(&preview_rows(grid, color));
                }
                for slot in rest {
                    label.push_str(&format!("<tr>{}</tr>", object_cell(slot, color)));
                }
            }
        }
        _ => {
            for slot in &node.slots {
                label.push_str(&format!("<tr>{}</tr>", object_cell(slot, color)));
            }
        }
    }

    label.push_str("</table></td></tr></table></font>>");
    label
}

fn object_cell(slot: &Slot, color: Option<&str>) -> String {
    if slot.placeholder {
        return format!("<td border=\"1\" width=\"{}\"></td>", PLACEHOLDER_WIDTH);
    }
    let port = slot
        .port
        .map(|port| format!(" port=\"p{}\"", port.0))
        .unwrap_or_default();
    let fill = color
        .map(|color| format!(" bgcolor=\"{}\"", color))
        .unwrap_or_default();
    format!(
        "<td border=\"1\" width=\"{}\"{}{}>{}</td>",
        OBJECT_SLOT_WIDTH,
        port,
        fill,
        cell_text(&slot.label)
    )
}

fn preview_rows(grid: &Grid, color: Option<&str>) -> String {
    let fill = color
        .map(|color| format!(" bgcolor=\"{}\"", color))
        .unwrap_or_default();
    let mut rows = String::from(
        "<tr><td><table cellpadding=\"2\" cellspacing=\"0\" border=\"0\">",
    );
    for row in 0..grid.rows {
        rows.push_str("<tr>");
        for cell in grid.row(row) {
            rows.push_str(&format!(
                "<td border=\"1\"{}>{}</td>",
                fill,
                cell_text(cell)
            ));
        }
        rows.push_str("</tr>");
    }
    rows.push_str("</table></td></tr>");
    rows
}

fn cell_text(text: &str) -> String {
    if text.is_empty() {
        "&nbsp;".to_string()
    } else {
        escape_html(text)
    }
}

/// Escape text for use inside an HTML-like label.
///
/// Control characters other than tab become visible `\xNN` text.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("<br/>"),
            // Not allowed in XML even as references; show the escape instead
            _ if c.is_control() && c != '\t' => {
                escaped.push_str(&format!("\\x{:02x}", c as u32));
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
