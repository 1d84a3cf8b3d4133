//! Component state of the annotation editor.
//!
//! The editor owns the document block being annotated and the annotation
//! tool. The tool itself keeps no timers or DOM handles: the debounce timer
//! lives here and is dropped (which cancels it) whenever the tool clears its
//! search.

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use common::document::InlineDocument;
use common::search::SearchIndex;
use common::toolbar::{AnnotationToolbar, ToolbarState};

pub const SAMPLE_TEXT: &str = "The orc is blinded by the flash and frightened of the wizard. \
Its axe deals slashing damage, while the wizard answers with fire.";

pub struct EditorComponent {
    /// The block of inline content the tool works on.
    pub document: InlineDocument,

    pub toolbar: AnnotationToolbar,

    /// Active tab: `"editor"` or `"html"`.
    pub active_tab: String,

    /// Plain text of the replacement box under the editor.
    pub draft: String,

    /// The rendered document surface. DOM selections inside it are mapped
    /// to document offsets.
    pub surface_ref: NodeRef,

    /// The search input of the tool's panel.
    pub input_ref: NodeRef,

    /// Pending debounce timer of the current search ticket.
    pub debounce: Option<Timeout>,

    /// Push the document selection back to the browser on the next render.
    pub sync_selection: bool,

    /// Focus the search input on the next render.
    pub focus_input: bool,

    /// Guard to avoid loading the configuration more than once.
    pub loaded: bool,
}

impl EditorComponent {
    pub fn new(initial_text: Option<&str>) -> Self {
        let text = initial_text.unwrap_or(SAMPLE_TEXT);
        Self {
            document: InlineDocument::from_text(text),
            toolbar: AnnotationToolbar::new(SearchIndex::default()),
            active_tab: "editor".to_string(),
            draft: text.to_string(),
            surface_ref: NodeRef::default(),
            input_ref: NodeRef::default(),
            debounce: None,
            sync_selection: false,
            focus_input: false,
            loaded: false,
        }
    }

    pub fn is_panel_open(&self) -> bool {
        self.toolbar.state() != ToolbarState::Closed
    }

    /// Drops the pending search timer unless the search panel is still open.
    pub fn drop_timer_if_closed(&mut self) {
        if self.toolbar.state() != ToolbarState::OpenForNew {
            self.debounce = None;
        }
    }
}
