//! Update function of the annotation editor.
//!
//! Elm-style: mutates the component for a `Msg` and returns whether to
//! re-render. Every tool operation runs against an [`EditorHost`] built for
//! that one message; its notices become toasts and a close request hides the
//! panel and gives the browser selection back.

use gloo_timers::callback::Timeout;
use log::{debug, info};
use yew::platform::spawn_local;
use yew::prelude::*;

use common::document::{DocumentTree, InlineDocument};
use common::search::sequencer::DEBOUNCE_TIMEOUT_MS;
use common::search::SearchIndex;
use common::toolbar::{AnnotationToolbar, InputAction, ToolbarState};

use super::dom;
use super::fetch::fetch_dataset;
use super::host::EditorHost;
use super::messages::Msg;
use super::state::EditorComponent;

pub fn update(component: &mut EditorComponent, ctx: &Context<EditorComponent>, msg: Msg) -> bool {
    match msg {
        Msg::SetTab(tab) => {
            if component.is_panel_open() {
                component.toolbar.clear(&mut component.document);
                component.debounce = None;
            }
            component.active_tab = tab;
            true
        }
        Msg::ConfigLoaded(config) => {
            component.toolbar.clear(&mut component.document);
            component.debounce = None;
            component.toolbar = AnnotationToolbar::new(SearchIndex::new(&config));
            true
        }
        Msg::SelectionChanged => {
            let offsets = component
                .surface_ref
                .cast::<web_sys::Element>()
                .and_then(|surface| dom::selection_offsets(&surface));
            let range = offsets.and_then(|(start, end)| component.document.range_at(start, end));
            if range == component.document.selection() && component.toolbar.state() != ToolbarState::OpenForNew {
                return false;
            }
            component.document.set_selection(range);

            // A new selection closes the inline toolbar, like the editor does
            // when the user clicks elsewhere.
            if component.toolbar.state() == ToolbarState::OpenForNew {
                component.toolbar.clear(&mut component.document);
                component.debounce = None;
            }
            component.toolbar.check_state(&component.document);
            true
        }
        Msg::Surround => {
            if component.active_tab != "editor" {
                return false;
            }
            // The inline toolbar checks the selection whenever it opens.
            component.toolbar.check_state(&component.document);
            let mut host = EditorHost::new(&mut component.document);
            component.toolbar.surround(&mut host);
            let closed = host.finish();

            if component.toolbar.state() == ToolbarState::OpenForNew {
                component.focus_input = true;
            }
            after_tool_event(component, closed);
            true
        }
        Msg::ClosePanel => {
            component.toolbar.clear(&mut component.document);
            component.debounce = None;
            component.sync_selection = true;
            true
        }
        Msg::InputChanged(text) => {
            match component.toolbar.input_changed(&text) {
                InputAction::Cleared => component.debounce = None,
                InputAction::Schedule(ticket) => {
                    let link = ctx.link().clone();
                    // Replacing the timer drops, and so cancels, the previous one.
                    component.debounce = Some(Timeout::new(DEBOUNCE_TIMEOUT_MS, move || {
                        link.send_message(Msg::RunSearch(ticket));
                    }));
                }
                InputAction::Ignored => debug!("no sources configured, search ignored"),
            }
            true
        }
        Msg::RunSearch(ticket) => {
            component.debounce = None;
            if !component.toolbar.begin_search(&ticket) {
                return false;
            }

            let index = component.toolbar.index().clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let results = index
                    .query(&ticket.query, |source| fetch_dataset(source.path.clone()))
                    .await;
                link.send_message(Msg::SearchFinished(ticket, results));
            });
            true
        }
        Msg::SearchFinished(ticket, results) => {
            // A stale ticket renders nothing but may still end the spinner.
            let was_loading = component.toolbar.is_loading();
            let mut host = EditorHost::new(&mut component.document);
            let rendered = component.toolbar.finish_search(&ticket, results, &mut host);
            host.finish();
            rendered || was_loading != component.toolbar.is_loading()
        }
        Msg::Key(key) => {
            let mut host = EditorHost::new(&mut component.document);
            component.toolbar.key_pressed(key, &mut host);
            let closed = host.finish();
            after_tool_event(component, closed);
            true
        }
        Msg::HoverResults => {
            component.toolbar.hover();
            true
        }
        Msg::SelectCandidate(index) => {
            let mut host = EditorHost::new(&mut component.document);
            component.toolbar.select_candidate(index, &mut host);
            let closed = host.finish();
            after_tool_event(component, closed);
            true
        }
        Msg::UpdateDraft(text) => {
            component.draft = text;
            false
        }
        Msg::ReplaceText => {
            component.toolbar.clear(&mut component.document);
            component.debounce = None;
            component.document = InlineDocument::from_text(&component.draft);
            info!("document replaced ({} characters)", component.draft.chars().count());
            true
        }
    }
}

/// Common tail of the tool operations that may close the inline toolbar.
fn after_tool_event(component: &mut EditorComponent, closed: bool) {
    component.drop_timer_if_closed();
    if closed {
        component.sync_selection = true;
    }
}
