use common::document::InlineDocument;
use common::error::{Notice, NoticeStyle};
use common::toolbar::ToolHost;

use super::helpers::show_toast;
use crate::i18n;

/// The editor as seen by the annotation tool for the duration of one event.
pub struct EditorHost<'a> {
    document: &'a mut InlineDocument,
    closed: bool,
    notices: Vec<Notice>,
}

impl<'a> EditorHost<'a> {
    pub fn new(document: &'a mut InlineDocument) -> Self {
        Self {
            document,
            closed: false,
            notices: Vec::new(),
        }
    }

    /// Shows the collected notices. Returns whether the tool closed the
    /// inline toolbar.
    pub fn finish(self) -> bool {
        for notice in &self.notices {
            show_toast(&notice.message, notice.style == NoticeStyle::Error);
        }
        self.closed
    }
}

impl ToolHost for EditorHost<'_> {
    type Document = InlineDocument;

    fn document(&self) -> &InlineDocument {
        self.document
    }

    fn document_mut(&mut self) -> &mut InlineDocument {
        self.document
    }

    fn close_inline_toolbar(&mut self) {
        self.closed = true;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn translate(&self, key: &str) -> String {
        i18n::t(key)
    }
}
