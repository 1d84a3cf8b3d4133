//! Wrapping a range into an annotation element and back.

use super::{DocumentTree, InsertionPoint, NodeId, Range};
use crate::error::AnnotatorError;
use crate::model::annotation::{is_annotation, AnnotationMetadata, ANNOTATION_CLASS, ANNOTATION_TAG};
use log::{debug, warn};

/// Moves the content of `range` into a new annotation element and selects it.
///
/// A collapsed range is left alone and yields `Ok(None)`. Ranges touching an
/// existing annotation are rejected before anything is mutated.
pub fn wrap<D: DocumentTree + ?Sized>(
    doc: &mut D,
    range: &Range,
    metadata: &AnnotationMetadata,
) -> Result<Option<NodeId>, AnnotatorError> {
    if !doc.is_range_attached(range) {
        return Err(AnnotatorError::NoActiveSelection);
    }
    if range.is_collapsed() {
        return Ok(None);
    }

    let nested = doc
        .elements_in_range(range)
        .into_iter()
        .any(|node| doc.element(node).is_some_and(is_annotation));
    if nested {
        return Err(AnnotatorError::NestedAnnotation);
    }

    let (contents, at) = doc
        .extract_contents(range)
        .ok_or(AnnotatorError::NoActiveSelection)?;

    let span = doc.create_element(metadata.to_element());
    for node in contents {
        doc.append_child(span, node);
    }
    doc.insert_node(at, span);
    doc.expand_to_tag(span);

    debug!("wrapped annotation {} as {}", metadata.name, span);
    Ok(Some(span))
}

/// Replaces an annotation element by its own children and selects them.
///
/// The children are moved, not recreated. Nothing is mutated when the element
/// is detached or is not an annotation.
pub fn unwrap<D: DocumentTree + ?Sized>(doc: &mut D, element: NodeId) -> Result<(), AnnotatorError> {
    if !doc.is_attached(element) {
        warn!("cannot unwrap {}: element is detached", element);
        return Err(AnnotatorError::DetachedAnnotationElement);
    }
    if !doc.element(element).is_some_and(is_annotation) {
        return Err(AnnotatorError::NotAnAnnotation);
    }

    let extent = doc
        .expand_to_tag(element)
        .and_then(|range| doc.text_offsets(&range));

    let children = doc.take_children(element);
    let Some(at) = doc.remove(element) else {
        warn!("cannot unwrap {}: element has no parent", element);
        for child in children {
            doc.append_child(element, child);
        }
        return Err(AnnotatorError::DetachedAnnotationElement);
    };

    for (offset, child) in children.into_iter().enumerate() {
        doc.insert_node(
            InsertionPoint {
                parent: at.parent,
                index: at.index + offset,
            },
            child,
        );
    }

    let selection = extent.and_then(|(start, end)| doc.range_at(start, end));
    doc.set_selection(selection);

    debug!("unwrapped annotation {}", element);
    Ok(())
}

/// Nearest annotation element at or above `node`.
pub fn find_enclosing<D: DocumentTree + ?Sized>(doc: &D, node: NodeId) -> Option<NodeId> {
    find_parent_tag(doc, node, ANNOTATION_TAG, Some(ANNOTATION_CLASS))
}

/// Nearest element at or above `node` with the given tag and, optionally,
/// class. The walk stops at the document root.
pub fn find_parent_tag<D: DocumentTree + ?Sized>(
    doc: &D,
    node: NodeId,
    tag: &str,
    class: Option<&str>,
) -> Option<NodeId> {
    if !doc.is_attached(node) {
        return None;
    }

    let mut current = Some(node);
    while let Some(candidate) = current {
        if let Some(element) = doc.element(candidate) {
            let matches = element.tag.eq_ignore_ascii_case(tag)
                && class.is_none_or(|class| element.has_class(class));
            if matches {
                return Some(candidate);
            }
        }
        if candidate == doc.root() {
            break;
        }
        current = doc.parent(candidate);
    }
    None
}
