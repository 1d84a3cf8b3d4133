use super::{Boundary, DocumentTree, Element, InsertionPoint, NodeId, Range};
use crate::model::annotation::SanitizeRules;

#[derive(Debug, Clone)]
enum NodeKind {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bias {
    /// Prefer the node that starts at the offset.
    Forward,
    /// Prefer the node that ends at the offset.
    Backward,
}

/// Arena-backed block of inline content.
///
/// The root is a `div` element. Nodes are never freed: removing a node only
/// detaches it, so stale [`NodeId`]s keep answering `is_attached() == false`.
#[derive(Debug, Clone)]
pub struct InlineDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
    selection: Option<Range>,
    fake_highlight: Option<Range>,
}

impl Default for InlineDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Element(Element::new("div")),
            }],
            root: NodeId(0),
            selection: None,
            fake_highlight: None,
        }
    }

    /// A document holding a single text node.
    pub fn from_text(text: &str) -> Self {
        let mut document = Self::new();
        let root = document.root;
        document.append_text(root, text);
        document
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.push(NodeKind::Text(text.to_string()));
        self.append_child(parent, node);
        node
    }

    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        let node = self.create_element(element);
        self.append_child(parent, node);
        node
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Text of the whole document.
    pub fn full_text(&self) -> String {
        self.text_content(self.root)
    }

    pub fn fake_highlight(&self) -> Option<Range> {
        self.fake_highlight
    }

    /// Character length of the text under `node`.
    pub fn text_len(&self, node: NodeId) -> usize {
        match self.nodes.get(node.0).map(|data| &data.kind) {
            Some(NodeKind::Text(text)) => text.chars().count(),
            Some(NodeKind::Element(_)) => self.nodes[node.0]
                .children
                .iter()
                .map(|child| self.text_len(*child))
                .sum(),
            None => 0,
        }
    }

    /// Document-wide `(start, end)` offsets covered by an attached node.
    pub fn extent(&self, node: NodeId) -> Option<(usize, usize)> {
        if !self.is_attached(node) {
            return None;
        }

        let mut start = 0;
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            start += self.nodes[parent.0]
                .children
                .iter()
                .take_while(|sibling| **sibling != current)
                .map(|sibling| self.text_len(*sibling))
                .sum::<usize>();
            current = parent;
        }
        Some((start, start + self.text_len(node)))
    }

    /// Serializes the content under the root in its persisted HTML form.
    pub fn to_html(&self) -> String {
        self.to_html_with(|text, _, out| out.push_str(&escape_html(text)))
    }

    /// Serializes like [`to_html`](Self::to_html), but hands every text node
    /// to `paint_text` together with its document-wide start offset. The
    /// painter writes the (escaped) markup of that text into `out`.
    pub fn to_html_with(&self, mut paint_text: impl FnMut(&str, usize, &mut String)) -> String {
        let mut out = String::new();
        let mut offset = 0;
        for child in self.children(self.root) {
            self.write_html(*child, &mut offset, &mut paint_text, &mut out);
        }
        out
    }

    /// Applies a whitelist: elements with unknown tags are replaced by their
    /// children, and attributes outside the whitelist are dropped. Returns the
    /// number of elements unwrapped.
    pub fn sanitize(&mut self, rules: &SanitizeRules) -> usize {
        let mut elements = Vec::new();
        self.collect_elements(self.root, &mut elements);

        let mut unwrapped = 0;
        for node in elements.into_iter().rev() {
            let allowed = match &self.nodes[node.0].kind {
                NodeKind::Element(element) => rules.allows_tag(&element.tag),
                NodeKind::Text(_) => continue,
            };

            if !allowed {
                let children = self.take_children(node);
                if let Some(point) = self.remove(node) {
                    for (offset, child) in children.into_iter().enumerate() {
                        self.insert_node(
                            InsertionPoint {
                                parent: point.parent,
                                index: point.index + offset,
                            },
                            child,
                        );
                    }
                }
                unwrapped += 1;
                continue;
            }

            if let NodeKind::Element(element) = &mut self.nodes[node.0].kind {
                let tag = element.tag.clone();
                element
                    .attributes
                    .retain(|name, _| rules.allows_attribute(&tag, name));
                if !rules.allows_attribute(&tag, "class") {
                    element.classes.clear();
                }
                if !rules.allows_attribute(&tag, "style") {
                    element.style.clear();
                }
            }
        }
        unwrapped
    }

    /// Merges adjacent text nodes and drops empty ones, like `Node.normalize()`.
    pub fn normalize(&mut self) {
        let mut elements = vec![self.root];
        self.collect_elements(self.root, &mut elements);

        for element in elements {
            let children = std::mem::take(&mut self.nodes[element.0].children);
            let mut merged: Vec<NodeId> = Vec::with_capacity(children.len());

            for child in children {
                let text = match &self.nodes[child.0].kind {
                    NodeKind::Text(text) => text.clone(),
                    NodeKind::Element(_) => {
                        merged.push(child);
                        continue;
                    }
                };

                if text.is_empty() {
                    self.nodes[child.0].parent = None;
                    if let Some(previous) = merged.last().copied().filter(|p| self.text(*p).is_some()) {
                        let end = self.text_len(previous);
                        self.remap(|boundary| {
                            if boundary.node == child {
                                boundary.node = previous;
                                boundary.offset = end;
                            }
                        });
                    }
                    continue;
                }

                match merged.last().copied() {
                    Some(previous) if self.text(previous).is_some() => {
                        let shift = self.text_len(previous);
                        if let NodeKind::Text(previous_text) = &mut self.nodes[previous.0].kind {
                            previous_text.push_str(&text);
                        }
                        self.nodes[child.0].parent = None;
                        self.remap(|boundary| {
                            if boundary.node == child {
                                boundary.node = previous;
                                boundary.offset += shift;
                            }
                        });
                    }
                    _ => merged.push(child),
                }
            }

            self.nodes[element.0].children = merged;
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            parent: None,
            children: Vec::new(),
            kind,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.nodes.get(node.0).map(|data| &data.kind) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element(_)) => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    /// Elements under `node` (excluded) in document order.
    fn collect_elements(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node.0].children {
            if let NodeKind::Element(_) = self.nodes[child.0].kind {
                out.push(*child);
                self.collect_elements(*child, out);
            }
        }
    }

    /// Attached text nodes as `(node, start, len)`, in document order.
    fn text_runs(&self) -> Vec<(NodeId, usize, usize)> {
        fn walk(doc: &InlineDocument, node: NodeId, acc: &mut usize, out: &mut Vec<(NodeId, usize, usize)>) {
            match &doc.nodes[node.0].kind {
                NodeKind::Text(text) => {
                    let len = text.chars().count();
                    out.push((node, *acc, len));
                    *acc += len;
                }
                NodeKind::Element(_) => {
                    for child in &doc.nodes[node.0].children {
                        walk(doc, *child, acc, out);
                    }
                }
            }
        }

        let mut out = Vec::new();
        walk(self, self.root, &mut 0, &mut out);
        out
    }

    fn offset_of(&self, boundary: &Boundary) -> Option<usize> {
        let text = self.text(boundary.node)?;
        if boundary.offset > text.chars().count() {
            return None;
        }
        self.extent(boundary.node).map(|(start, _)| start + boundary.offset)
    }

    fn boundary_at(&self, offset: usize, bias: Bias) -> Option<Boundary> {
        let runs: Vec<_> = self.text_runs().into_iter().filter(|run| run.2 > 0).collect();

        let hit = runs.iter().find(|(_, start, len)| match bias {
            Bias::Forward => *start <= offset && offset < start + len,
            Bias::Backward => *start < offset && offset <= start + len,
        });
        if let Some((node, start, _)) = hit {
            return Some(Boundary {
                node: *node,
                offset: offset - start,
            });
        }

        // Document edges have no node on the preferred side.
        match (runs.first(), runs.last()) {
            (Some((first, 0, _)), _) if offset == 0 => Some(Boundary {
                node: *first,
                offset: 0,
            }),
            (_, Some((last, start, len))) if offset == start + len => Some(Boundary {
                node: *last,
                offset: *len,
            }),
            _ => None,
        }
    }

    fn lowest_common_element(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut chain = vec![a];
        let mut current = a;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }

        let mut candidate = Some(b);
        while let Some(node) = candidate {
            if chain.contains(&node) {
                return match self.nodes[node.0].kind {
                    NodeKind::Element(_) => Some(node),
                    NodeKind::Text(_) => self.nodes[node.0].parent,
                };
            }
            candidate = self.nodes[node.0].parent;
        }
        None
    }

    /// Makes a clean cut among the children of `parent` at the relative text
    /// offset `offset`, splitting whatever straddles it. Returns the child
    /// index of the cut.
    fn cut(&mut self, parent: NodeId, offset: usize) -> usize {
        let children = self.nodes[parent.0].children.clone();
        let mut acc = 0;
        for (index, child) in children.iter().enumerate() {
            if offset <= acc {
                return index;
            }
            let len = self.text_len(*child);
            if offset < acc + len {
                let right = self.split(*child, offset - acc);
                self.insert_child(parent, index + 1, right);
                return index + 1;
            }
            acc += len;
        }
        children.len()
    }

    /// Splits `node` at a relative offset strictly inside it. `node` keeps the
    /// left part; the detached right part is returned.
    fn split(&mut self, node: NodeId, at: usize) -> NodeId {
        let kind = self.nodes[node.0].kind.clone();
        match kind {
            NodeKind::Text(text) => {
                let byte = byte_index(&text, at);
                let right = self.push(NodeKind::Text(text[byte..].to_string()));
                self.nodes[node.0].kind = NodeKind::Text(text[..byte].to_string());
                self.remap(|boundary| {
                    if boundary.node == node && boundary.offset > at {
                        boundary.node = right;
                        boundary.offset -= at;
                    }
                });
                right
            }
            NodeKind::Element(element) => {
                let index = self.cut(node, at);
                let right = self.push(NodeKind::Element(element));
                let moved: Vec<NodeId> = self.nodes[node.0].children.drain(index..).collect();
                for child in &moved {
                    self.nodes[child.0].parent = Some(right);
                }
                self.nodes[right.0].children = moved;
                right
            }
        }
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn detach(&mut self, node: NodeId) -> Option<InsertionPoint> {
        let parent = self.nodes[node.0].parent.take()?;
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings.iter().position(|sibling| *sibling == node)?;
        siblings.remove(index);
        Some(InsertionPoint { parent, index })
    }

    /// Applies `update` to every stored boundary, so live ranges follow splits
    /// and merges.
    fn remap(&mut self, update: impl Fn(&mut Boundary)) {
        for range in [&mut self.selection, &mut self.fake_highlight].into_iter().flatten() {
            update(&mut range.start);
            update(&mut range.end);
        }
    }

    fn write_html(
        &self,
        node: NodeId,
        offset: &mut usize,
        paint_text: &mut impl FnMut(&str, usize, &mut String),
        out: &mut String,
    ) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => {
                paint_text(text, *offset, out);
                *offset += text.chars().count();
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                if !element.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape_html(&element.classes.join(" "))));
                }
                for (name, value) in &element.attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
                }
                if !element.style.is_empty() {
                    out.push_str(&format!(" style=\"{}\"", escape_html(&element.style_text())));
                }
                out.push('>');
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, offset, paint_text, out);
                }
                out.push_str(&format!("</{}>", element.tag));
            }
        }
    }
}

impl DocumentTree for InlineDocument {
    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        if node.0 >= self.nodes.len() {
            return false;
        }
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current == self.root
    }

    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn set_selection(&mut self, range: Option<Range>) {
        self.selection = range;
    }

    fn set_fake_highlight(&mut self, range: Option<Range>) {
        self.fake_highlight = range;
    }

    fn text_offsets(&self, range: &Range) -> Option<(usize, usize)> {
        let start = self.offset_of(&range.start)?;
        let end = self.offset_of(&range.end)?;
        (start <= end).then_some((start, end))
    }

    fn range_at(&self, start: usize, end: usize) -> Option<Range> {
        if start > end {
            return None;
        }
        let first = self.boundary_at(start, Bias::Forward)?;
        if start == end {
            return Some(Range {
                start: first,
                end: first,
            });
        }
        Some(Range {
            start: first,
            end: self.boundary_at(end, Bias::Backward)?,
        })
    }

    fn expand_to_tag(&mut self, element: NodeId) -> Option<Range> {
        let (start, end) = self.extent(element)?;
        let range = self.range_at(start, end)?;
        self.selection = Some(range);
        Some(range)
    }

    fn elements_in_range(&self, range: &Range) -> Vec<NodeId> {
        let Some((start, end)) = self.text_offsets(range) else {
            return Vec::new();
        };

        let mut elements = vec![self.root];
        self.collect_elements(self.root, &mut elements);
        elements
            .into_iter()
            .filter(|element| {
                self.extent(*element)
                    .is_some_and(|(el_start, el_end)| el_start < end && start < el_end)
            })
            .collect()
    }

    fn extract_contents(&mut self, range: &Range) -> Option<(Vec<NodeId>, InsertionPoint)> {
        let (start, end) = self.text_offsets(range)?;
        let ancestor = self.lowest_common_element(range.start.node, range.end.node)?;
        let (base, _) = self.extent(ancestor)?;

        let from = self.cut(ancestor, start - base);
        let to = self.cut(ancestor, end - base);
        let extracted: Vec<NodeId> = self.nodes[ancestor.0].children.drain(from..to).collect();
        for node in &extracted {
            self.nodes[node.0].parent = None;
        }

        Some((
            extracted,
            InsertionPoint {
                parent: ancestor,
                index: from,
            },
        ))
    }

    fn create_element(&mut self, element: Element) -> NodeId {
        self.push(NodeKind::Element(element))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let len = self.nodes[parent.0].children.len();
        self.insert_child(parent, len, child);
    }

    fn insert_node(&mut self, at: InsertionPoint, node: NodeId) {
        self.insert_child(at.parent, at.index, node);
    }

    fn take_children(&mut self, node: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in &children {
            self.nodes[child.0].parent = None;
        }
        children
    }

    fn remove(&mut self, node: NodeId) -> Option<InsertionPoint> {
        if node == self.root || node.0 >= self.nodes.len() {
            return None;
        }
        self.detach(node)
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// Escapes `&`, `<`, `>`, `"` and `'` for text and attribute values.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `Hello <b>bold world</b> again`
    fn sample() -> (InlineDocument, NodeId, NodeId) {
        let mut doc = InlineDocument::new();
        let root = doc.root();
        doc.append_text(root, "Hello ");
        let bold = doc.append_element(root, Element::new("b"));
        let inner = doc.append_text(bold, "bold world");
        doc.append_text(root, " again");
        (doc, bold, inner)
    }

    #[test]
    fn test_offsets_round_trip_through_boundaries() {
        let (doc, _, inner) = sample();
        assert_eq!(doc.full_text(), "Hello bold world again");

        let range = doc.range_at(6, 10).unwrap();
        assert_eq!(range.start, Boundary { node: inner, offset: 0 });
        assert_eq!(range.end, Boundary { node: inner, offset: 4 });
        assert_eq!(doc.text_offsets(&range), Some((6, 10)));
    }

    #[test]
    fn test_range_at_prefers_inner_nodes_at_edges() {
        let (doc, _, inner) = sample();
        // 6..16 is exactly the bold text: both ends land inside it.
        let range = doc.range_at(6, 16).unwrap();
        assert_eq!(range.start.node, inner);
        assert_eq!(range.end, Boundary { node: inner, offset: 10 });
        assert!(doc.range_at(3, 2).is_none());
        assert!(doc.range_at(0, 99).is_none());
    }

    #[test]
    fn test_extract_splits_straddled_element() {
        let (mut doc, bold, _) = sample();
        let range = doc.range_at(3, 10).unwrap();

        let (nodes, point) = doc.extract_contents(&range).unwrap();
        assert_eq!(point, InsertionPoint { parent: doc.root(), index: 1 });

        let extracted: String = nodes.iter().map(|n| doc.text_content(*n)).collect();
        assert_eq!(extracted, "lo bold");
        assert_eq!(doc.full_text(), "Hel world again");
        // The original <b> keeps the left half and leaves with the extraction.
        assert!(nodes.contains(&bold));
        assert!(!doc.is_attached(bold));
    }

    #[test]
    fn test_split_keeps_live_selection_on_same_text() {
        let mut doc = InlineDocument::from_text("abcdef");
        let selection = doc.range_at(4, 5).unwrap();
        doc.set_selection(Some(selection));

        let cut = doc.range_at(1, 3).unwrap();
        doc.extract_contents(&cut).unwrap();

        let live = doc.selection().unwrap();
        assert!(doc.is_range_attached(&live));
        assert_eq!(doc.text_offsets(&live), Some((2, 3)));
    }

    #[test]
    fn test_remove_detaches_and_reports_position() {
        let (mut doc, bold, inner) = sample();
        let point = doc.remove(bold).unwrap();
        assert_eq!(point.index, 1);
        assert!(!doc.is_attached(bold));
        assert!(!doc.is_attached(inner));
        assert!(doc.extent(inner).is_none());
        assert!(doc.remove(doc.root()).is_none());
    }

    #[test]
    fn test_html_escapes_text_and_attributes() {
        let mut doc = InlineDocument::new();
        let root = doc.root();
        let mut element = Element::new("span").with_class("annotation");
        element.set_attribute("data-name", "Fish & \"Chips\"");
        element.style.insert("color".into(), "red".into());
        let span = doc.append_element(root, element);
        doc.append_text(span, "<tag>");

        assert_eq!(
            doc.to_html(),
            "<span class=\"annotation\" data-name=\"Fish &amp; &quot;Chips&quot;\" style=\"color: red\">&lt;tag&gt;</span>"
        );
    }

    #[test]
    fn test_sanitize_unwraps_unknown_tags_and_drops_attributes() {
        let mut doc = InlineDocument::new();
        let root = doc.root();
        let bold = doc.append_element(root, Element::new("b"));
        let mut element = Element::new("span").with_class("annotation");
        element.set_attribute("data-name", "Prone");
        element.set_attribute("onclick", "alert(1)");
        let span = doc.append_element(bold, element);
        let text = doc.append_text(span, "down");

        let unwrapped = doc.sanitize(&SanitizeRules::for_annotations());

        assert_eq!(unwrapped, 1);
        assert!(!doc.is_attached(bold));
        assert_eq!(doc.children(root), &[span]);
        assert_eq!(doc.children(span), &[text]);
        assert_eq!(doc.element(span).unwrap().attribute("onclick"), None);
        assert_eq!(doc.element(span).unwrap().attribute("data-name"), Some("Prone"));
    }

    #[test]
    fn test_html_painter_sees_document_offsets() {
        let mut doc = InlineDocument::new();
        let root = doc.root();
        doc.append_text(root, "a<");
        let bold = doc.append_element(root, Element::new("b"));
        doc.append_text(bold, "bc");
        doc.append_text(root, "d");

        let mut runs = Vec::new();
        let html = doc.to_html_with(|text, start, out| {
            runs.push((text.to_string(), start));
            out.push_str(&format!("[{}]", escape_html(text)));
        });

        assert_eq!(html, "[a&lt;]<b>[bc]</b>[d]");
        assert_eq!(
            runs,
            vec![("a<".to_string(), 0), ("bc".to_string(), 2), ("d".to_string(), 4)]
        );
    }

    #[test]
    fn test_normalize_merges_text_under_the_root() {
        let mut doc = InlineDocument::from_text("The orc");
        let root = doc.root();
        doc.append_text(root, " is ");
        doc.append_text(root, "blinded");

        doc.normalize();

        assert_eq!(doc.children(root).len(), 1);
        assert_eq!(doc.to_html(), "The orc is blinded");
    }

    #[test]
    fn test_normalize_merges_text_and_follows_selection() {
        let mut doc = InlineDocument::new();
        let root = doc.root();
        let first = doc.append_text(root, "ab");
        let empty = doc.append_text(root, "");
        let second = doc.append_text(root, "cd");
        doc.set_selection(Some(Range {
            start: Boundary { node: second, offset: 1 },
            end: Boundary { node: second, offset: 2 },
        }));

        doc.normalize();

        assert_eq!(doc.children(root), &[first]);
        assert!(!doc.is_attached(empty));
        assert_eq!(doc.text(first), Some("abcd"));
        assert_eq!(doc.text_offsets(&doc.selection().unwrap()), Some((3, 4)));
    }

    #[test]
    fn test_multibyte_text_splits_on_characters() {
        let mut doc = InlineDocument::from_text("héllo wörld");
        let range = doc.range_at(1, 4).unwrap();
        let (nodes, _) = doc.extract_contents(&range).unwrap();
        assert_eq!(doc.text_content(nodes[0]), "éll");
        assert_eq!(doc.full_text(), "ho wörld");
    }
}
