//! The inline annotation tool.
//!
//! [`AnnotationToolbar`] is driven by the host editor: `check_state` on every
//! selection change, `surround` when the tool button (or its shortcut) is
//! used, `clear` when the inline toolbar closes, plus the input and key events
//! of its own panel. Timers and fetches belong to the host; the toolbar hands
//! out [`SearchTicket`]s and only accepts results for the current one.

use crate::document::selection::SelectionStore;
use crate::document::{span, DocumentTree, NodeId};
use crate::error::{AnnotatorError, Notice, SourceError};
use crate::model::annotation::{AnnotationMetadata, SanitizeRules};
use crate::model::candidate::CandidateItem;
use crate::search::sequencer::{SearchSequencer, SearchTicket};
use crate::search::{QueryResults, SearchIndex};
use log::debug;

pub mod dictionary;
pub mod results;

use results::{NavDirection, ResultListController};

/// What the tool needs from the editor hosting it.
pub trait ToolHost {
    type Document: DocumentTree;

    fn document(&self) -> &Self::Document;

    fn document_mut(&mut self) -> &mut Self::Document;

    fn close_inline_toolbar(&mut self);

    /// The single user-notification channel.
    fn notify(&mut self, notice: Notice);

    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarState {
    Closed,
    /// The search panel is open for a new annotation.
    OpenForNew,
    /// The caret is inside an annotation; the tool offers to remove it.
    OpenForExisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarKey {
    Up,
    Down,
    Enter,
}

impl ToolbarKey {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(ToolbarKey::Up),
            "ArrowDown" => Some(ToolbarKey::Down),
            "Enter" => Some(ToolbarKey::Enter),
            _ => None,
        }
    }
}

/// What the host must do after the search input changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Drop any pending timer; the list was emptied.
    Cleared,
    /// Drop any pending timer and arm a new one for this ticket.
    Schedule(SearchTicket),
    /// No sources are configured, nothing to search.
    Ignored,
}

pub struct AnnotationToolbar {
    index: SearchIndex,
    state: ToolbarState,
    existing: Option<(NodeId, AnnotationMetadata)>,
    input: String,
    selection: SelectionStore,
    results: ResultListController,
    sequencer: SearchSequencer,
}

impl AnnotationToolbar {
    pub const IS_INLINE: bool = true;
    pub const TITLE: &'static str = dictionary::TITLE;
    pub const SHORTCUT: &'static str = "Ctrl+L";

    pub fn new(index: SearchIndex) -> Self {
        Self {
            index,
            state: ToolbarState::Closed,
            existing: None,
            input: String::new(),
            selection: SelectionStore::new(),
            results: ResultListController::new(),
            sequencer: SearchSequencer::new(),
        }
    }

    /// Attributes the host sanitizer must leave on annotation elements.
    pub fn sanitize() -> SanitizeRules {
        SanitizeRules::for_annotations()
    }

    pub fn state(&self) -> ToolbarState {
        self.state
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Metadata of the annotation under the caret, for the preview panel.
    pub fn preview(&self) -> Option<&AnnotationMetadata> {
        self.existing.as_ref().map(|(_, metadata)| metadata)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn results(&self) -> &ResultListController {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    /// Dictionary key of the search input placeholder.
    pub fn placeholder_key(&self) -> &'static str {
        if self.index.has_sources() {
            dictionary::SEARCH_PLACEHOLDER
        } else {
            dictionary::NO_SOURCES_AVAILABLE
        }
    }

    pub fn placeholder<H: ToolHost>(&self, host: &H) -> String {
        host.translate(self.placeholder_key())
    }

    /// Looks for an annotation around the selection anchor. Returns whether
    /// one was found, i.e. whether the button shows the "remove" action.
    pub fn check_state<D: DocumentTree + ?Sized>(&mut self, doc: &D) -> bool {
        self.existing = doc
            .selection()
            .and_then(|range| span::find_enclosing(doc, range.start.node))
            .and_then(|element| {
                let metadata = AnnotationMetadata::from_element(doc.element(element)?)?;
                Some((element, metadata))
            });

        if self.state != ToolbarState::OpenForNew {
            self.state = match self.existing {
                Some(_) => ToolbarState::OpenForExisting,
                None => ToolbarState::Closed,
            };
        }
        self.existing.is_some()
    }

    /// The tool button was pressed over the current selection.
    pub fn surround<H: ToolHost>(&mut self, host: &mut H) {
        if self.state == ToolbarState::OpenForNew {
            debug!("annotation toolbar already open, closing it first");
            // `clear` resets the tool; the last `check_state` result still applies.
            let existing = self.existing.take();
            host.close_inline_toolbar();
            self.clear(host.document_mut());
            self.existing = existing;
        }

        let doc = host.document_mut();
        if !self.selection.save(doc) {
            return;
        }
        self.selection.set_fake_highlight(doc, true);

        let Some((element, _)) = self.existing.take() else {
            self.state = ToolbarState::OpenForNew;
            return;
        };

        let outcome = span::unwrap(doc, element);
        self.selection.set_fake_highlight(doc, false);
        self.selection.clear();
        if let Err(err) = outcome {
            self.report(&err, host);
        }
        host.close_inline_toolbar();
        self.reset();
    }

    /// The inline toolbar is closing. If it was interrupted by a new
    /// selection while the fake highlight was painted, that new selection
    /// survives the cleanup.
    pub fn clear<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) {
        if self.selection.is_fake_highlight_active() {
            let mut current = SelectionStore::new();
            current.save(doc);

            self.selection.restore(doc);
            self.selection.set_fake_highlight(doc, false);
            self.selection.clear();

            current.restore(doc);
        }
        self.reset();
    }

    pub fn input_changed(&mut self, text: &str) -> InputAction {
        self.input = text.to_string();

        if text.trim().is_empty() {
            self.sequencer.cancel();
            self.results.clear();
            return InputAction::Cleared;
        }
        if !self.index.has_sources() {
            return InputAction::Ignored;
        }
        InputAction::Schedule(self.sequencer.arm(text))
    }

    /// The debounce timer of `ticket` fired. Returns `false` when a newer
    /// keystroke made it stale; the search must then not run.
    pub fn begin_search(&mut self, ticket: &SearchTicket) -> bool {
        self.sequencer.start(ticket)
    }

    /// Applies the results of `ticket` if it is still current. Failed sources
    /// are reported, the rest is rendered.
    pub fn finish_search<H: ToolHost>(
        &mut self,
        ticket: &SearchTicket,
        results: QueryResults,
        host: &mut H,
    ) -> bool {
        if !self.sequencer.finish(ticket) {
            debug!("dropping stale results for {:?}", ticket.query);
            return false;
        }

        for err in results.errors() {
            let notice = Notice::error(source_error_message(err, host));
            host.notify(notice);
        }
        self.results.render(results.into_lists());
        true
    }

    /// Returns whether the key was handled.
    pub fn key_pressed<H: ToolHost>(&mut self, key: ToolbarKey, host: &mut H) -> bool {
        match key {
            ToolbarKey::Up => self.results.navigate(NavDirection::Previous),
            ToolbarKey::Down => self.results.navigate(NavDirection::Next),
            ToolbarKey::Enter => match self.results.commit(&self.input) {
                Ok(item) => self.apply(item, host),
                Err(err) => self.report(&err, host),
            },
        }
        true
    }

    /// The pointer entered the result list.
    pub fn hover(&mut self) {
        self.results.hover();
    }

    /// A result was clicked.
    pub fn select_candidate<H: ToolHost>(&mut self, index: usize, host: &mut H) {
        if let Some(item) = self.results.select(index).cloned() {
            self.apply(item, host);
        }
    }

    /// Wraps the originally saved selection with `item` and closes.
    fn apply<H: ToolHost>(&mut self, item: CandidateItem, host: &mut H) {
        let doc = host.document_mut();
        let restored = self.selection.restore(doc);
        let outcome = match doc.selection() {
            Some(range) if restored => span::wrap(doc, &range, &item.to_metadata()).map(|_| ()),
            _ => Err(AnnotatorError::NoActiveSelection),
        };
        self.selection.set_fake_highlight(doc, false);

        if let Err(err) = outcome {
            self.report(&err, host);
        }
        host.close_inline_toolbar();
        self.reset();
    }

    fn reset(&mut self) {
        self.state = ToolbarState::Closed;
        self.existing = None;
        self.input.clear();
        self.results.clear();
        self.sequencer.cancel();
    }

    fn report<H: ToolHost>(&self, err: &AnnotatorError, host: &mut H) {
        let message = match err {
            AnnotatorError::NoActiveSelection => {
                debug!("no active selection, nothing to do");
                return;
            }
            AnnotatorError::InvalidSelection => host.translate(dictionary::INVALID_ANNOTATION_NAME),
            AnnotatorError::NestedAnnotation => host.translate(dictionary::NESTED_ANNOTATION),
            AnnotatorError::DetachedAnnotationElement => {
                host.translate(dictionary::DETACHED_ANNOTATION)
            }
            AnnotatorError::NotAnAnnotation => host.translate(dictionary::NOT_AN_ANNOTATION),
            AnnotatorError::Source(err) => source_error_message(err, host),
        };
        host.notify(Notice::error(message));
    }
}

fn source_error_message<H: ToolHost>(err: &SourceError, host: &H) -> String {
    match err {
        SourceError::FetchFailed { reason, .. } => format!(
            "{} \"{}\"",
            host.translate(dictionary::SEARCH_REQUEST_ERROR),
            reason
        ),
        SourceError::InvalidServerData { .. } => host.translate(dictionary::INVALID_SERVER_DATA),
    }
}
