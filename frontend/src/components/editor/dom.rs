//! Bridge between the rendered surface and the document model.
//!
//! The surface is the document rendered as HTML, text nodes in document
//! order, so a character offset in the document is the number of characters
//! of surface text before a DOM position. The fake highlight is painted as an
//! extra span that adds no text.

use web_sys::{Element, Node};

use common::document::inline::escape_html;
use common::document::{DocumentTree, InlineDocument};

use super::helpers::char_to_utf16_idx;

pub const FAKE_HIGHLIGHT_CLASS: &str = "fake-highlight";

/// Markup of the editor surface.
pub fn render_surface_html(doc: &InlineDocument) -> String {
    let highlight = doc
        .fake_highlight()
        .and_then(|range| doc.text_offsets(&range))
        .filter(|(start, end)| start < end);

    doc.to_html_with(|text, start, out| write_text(text, start, highlight, out))
}

fn write_text(text: &str, start: usize, highlight: Option<(usize, usize)>, out: &mut String) {
    let len = text.chars().count();
    let marked = highlight
        .map(|(from, to)| {
            (
                from.clamp(start, start + len) - start,
                to.clamp(start, start + len) - start,
            )
        })
        .filter(|(from, to)| from < to);

    let Some((from, to)) = marked else {
        out.push_str(&escape_html(text));
        return;
    };

    let (before, rest) = split_at_char(text, from);
    let (inside, after) = split_at_char(rest, to - from);
    out.push_str(&escape_html(before));
    out.push_str(&format!(
        "<span class=\"{}\">{}</span>",
        FAKE_HIGHLIGHT_CLASS,
        escape_html(inside)
    ));
    out.push_str(&escape_html(after));
}

fn split_at_char(s: &str, chars: usize) -> (&str, &str) {
    let byte = s.char_indices().nth(chars).map_or(s.len(), |(byte, _)| byte);
    s.split_at(byte)
}

/// Document offsets of the browser selection, if it lies inside `surface`.
/// The pair is ordered, whatever the direction of the selection.
pub fn selection_offsets(surface: &Element) -> Option<(usize, usize)> {
    let selection = web_sys::window()?.get_selection().ok()??;
    if selection.range_count() == 0 {
        return None;
    }
    let anchor = boundary_offset(surface, &selection.anchor_node()?, selection.anchor_offset())?;
    let focus = boundary_offset(surface, &selection.focus_node()?, selection.focus_offset())?;
    Some((anchor.min(focus), anchor.max(focus)))
}

fn boundary_offset(surface: &Element, node: &Node, offset: u32) -> Option<usize> {
    if !surface.contains(Some(node)) {
        return None;
    }
    let range = surface.owner_document()?.create_range().ok()?;
    range.set_start(surface, 0).ok()?;
    range.set_end(node, offset).ok()?;
    Some(String::from(range.to_string()).chars().count())
}

/// Shows the document selection as the browser selection.
pub fn select_document_range(surface: &Element, doc: &InlineDocument) {
    let Some((start, end)) = doc.selection().and_then(|range| doc.text_offsets(&range)) else {
        return;
    };
    if apply_browser_selection(surface, start, end).is_none() {
        log::debug!("cannot map offsets {}..{} onto the surface", start, end);
    }
}

fn apply_browser_selection(surface: &Element, start: usize, end: usize) -> Option<()> {
    let mut text_nodes = Vec::new();
    collect_text_nodes(surface, &mut text_nodes);
    let (start_node, start_offset) = locate(surface, &text_nodes, start)?;
    let (end_node, end_offset) = locate(surface, &text_nodes, end)?;

    let range = surface.owner_document()?.create_range().ok()?;
    range.set_start(&start_node, start_offset).ok()?;
    range.set_end(&end_node, end_offset).ok()?;

    let selection = web_sys::window()?.get_selection().ok()??;
    selection.remove_all_ranges().ok()?;
    selection.add_range(&range).ok()
}

fn collect_text_nodes(node: &Node, out: &mut Vec<Node>) {
    let children = node.child_nodes();
    for i in 0..children.length() {
        if let Some(child) = children.item(i) {
            if child.node_type() == Node::TEXT_NODE {
                out.push(child);
            } else {
                collect_text_nodes(&child, out);
            }
        }
    }
}

/// The text node and UTF-16 offset of a document character offset.
fn locate(surface: &Element, text_nodes: &[Node], offset: usize) -> Option<(Node, u32)> {
    let mut remaining = offset;
    for node in text_nodes {
        let text = node.text_content().unwrap_or_default();
        let len = text.chars().count();
        if remaining <= len {
            return Some((node.clone(), char_to_utf16_idx(&text, remaining)));
        }
        remaining -= len;
    }
    (offset == 0).then(|| (Node::clone(surface), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::document::span;
    use common::model::annotation::AnnotationMetadata;

    #[test]
    fn test_surface_marks_the_fake_highlight() {
        let mut doc = InlineDocument::from_text("a <b> c");
        let range = doc.range_at(2, 5);
        doc.set_fake_highlight(range);
        assert_eq!(
            render_surface_html(&doc),
            "a <span class=\"fake-highlight\">&lt;b&gt;</span> c"
        );
    }

    #[test]
    fn test_surface_highlight_spans_annotations() {
        let mut doc = InlineDocument::from_text("The orc is blinded now");
        let range = doc.range_at(11, 18).unwrap();
        span::wrap(&mut doc, &range, &AnnotationMetadata::named("Blinded")).unwrap();
        let wide = doc.range_at(8, 20);
        doc.set_fake_highlight(wide);

        assert_eq!(
            render_surface_html(&doc),
            "The orc <span class=\"fake-highlight\">is </span>\
             <span class=\"annotation\" data-name=\"Blinded\">\
             <span class=\"fake-highlight\">blinded</span></span>\
             <span class=\"fake-highlight\"> n</span>ow"
        );
    }

    #[test]
    fn test_split_at_char_handles_multibyte() {
        assert_eq!(split_at_char("ñandú", 2), ("ña", "ndú"));
        assert_eq!(split_at_char("ab", 5), ("ab", ""));
    }
}
