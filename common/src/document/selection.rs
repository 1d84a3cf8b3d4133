use super::{DocumentTree, Range};
use log::warn;

/// A saved selection plus whether the fake highlight is painted over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub range: Range,
    pub fake_highlight_active: bool,
}

/// Holds at most one saved selection while a panel has the focus.
///
/// `save` overwrites, `restore` consumes. The fake highlight is tied to the
/// snapshot: restoring the native selection removes it.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    snapshot: Option<SelectionSnapshot>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_fake_highlight_active(&self) -> bool {
        self.snapshot
            .is_some_and(|snapshot| snapshot.fake_highlight_active)
    }

    /// Captures the host's live selection, replacing any previous snapshot.
    /// Returns `false`, keeping the previous snapshot, when there is none.
    pub fn save<D: DocumentTree + ?Sized>(&mut self, doc: &D) -> bool {
        let Some(range) = doc.selection() else {
            return false;
        };
        self.snapshot = Some(SelectionSnapshot {
            range,
            fake_highlight_active: false,
        });
        true
    }

    /// Reinstates the snapshot as the live selection and consumes it.
    ///
    /// When the snapshot no longer points into the document the selection is
    /// left alone and `false` is returned.
    pub fn restore<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        if snapshot.fake_highlight_active {
            doc.set_fake_highlight(None);
        }

        if !doc.is_range_attached(&snapshot.range) {
            warn!("saved selection is detached from the document, not restoring it");
            return false;
        }
        doc.set_selection(Some(snapshot.range));
        true
    }

    /// Paints or removes the fake highlight over the snapshot range. Repeated
    /// calls with the same value change nothing.
    pub fn set_fake_highlight<D: DocumentTree + ?Sized>(&mut self, doc: &mut D, on: bool) {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return;
        };
        if snapshot.fake_highlight_active == on {
            return;
        }

        if on {
            if !doc.is_range_attached(&snapshot.range) {
                return;
            }
            doc.set_fake_highlight(Some(snapshot.range));
        } else {
            doc.set_fake_highlight(None);
        }
        snapshot.fake_highlight_active = on;
    }

    /// Drops the snapshot without touching the selection.
    pub fn clear(&mut self) {
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InlineDocument;

    fn selected(text: &str, start: usize, end: usize) -> InlineDocument {
        let mut doc = InlineDocument::from_text(text);
        let range = doc.range_at(start, end).unwrap();
        doc.set_selection(Some(range));
        doc
    }

    #[test]
    fn test_save_without_selection_keeps_previous_snapshot() {
        let doc = selected("abcdef", 1, 3);
        let mut store = SelectionStore::new();
        assert!(store.save(&doc));

        let empty = InlineDocument::from_text("abcdef");
        assert!(!store.save(&empty));
        assert_eq!(store.snapshot().unwrap().range, doc.selection().unwrap());
    }

    #[test]
    fn test_restore_consumes_snapshot() {
        let mut doc = selected("abcdef", 1, 3);
        let mut store = SelectionStore::new();
        store.save(&doc);
        doc.set_selection(None);

        assert!(store.restore(&mut doc));
        assert_eq!(doc.text_offsets(&doc.selection().unwrap()), Some((1, 3)));
        assert!(store.snapshot().is_none());
        assert!(!store.restore(&mut doc));
    }

    #[test]
    fn test_restore_of_detached_range_is_silent() {
        let mut doc = InlineDocument::new();
        let root = doc.root();
        let text = doc.append_text(root, "gone");
        doc.set_selection(doc.range_at(0, 2));

        let mut store = SelectionStore::new();
        store.save(&doc);
        doc.set_selection(None);
        doc.remove(text);

        assert!(!store.restore(&mut doc));
        assert_eq!(doc.selection(), None);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_fake_highlight_is_idempotent() {
        let mut doc = selected("abcdef", 2, 4);
        let mut store = SelectionStore::new();

        store.set_fake_highlight(&mut doc, true);
        assert_eq!(doc.fake_highlight(), None, "nothing to paint without a snapshot");

        store.save(&doc);
        store.set_fake_highlight(&mut doc, true);
        store.set_fake_highlight(&mut doc, true);
        assert!(store.is_fake_highlight_active());
        assert_eq!(doc.fake_highlight(), doc.selection());

        store.set_fake_highlight(&mut doc, false);
        store.set_fake_highlight(&mut doc, false);
        assert!(!store.is_fake_highlight_active());
        assert_eq!(doc.fake_highlight(), None);
    }

    #[test]
    fn test_restore_removes_fake_highlight() {
        let mut doc = selected("abcdef", 0, 6);
        let mut store = SelectionStore::new();
        store.save(&doc);
        store.set_fake_highlight(&mut doc, true);
        doc.set_selection(None);

        store.restore(&mut doc);
        assert_eq!(doc.fake_highlight(), None);
        assert!(doc.selection().is_some());
    }

    #[test]
    fn test_clear_keeps_live_selection() {
        let mut doc = selected("abcdef", 1, 2);
        let mut store = SelectionStore::new();
        store.save(&doc);
        store.clear();
        assert!(store.snapshot().is_none());
        assert!(!store.restore(&mut doc));
        assert!(doc.selection().is_some());
    }
}
