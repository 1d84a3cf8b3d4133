//! View rendering of the annotation editor.
//!
//! Two tabs: "Editor" (the document surface, the tool button and the tool's
//! inline panel) and "HTML" (the block as it would be saved, after the
//! tool's sanitizer whitelist). The surface is plain markup rebuilt from the
//! document on every render; the panel is ordinary Yew markup.

use common::model::annotation::AnnotationMetadata;
use common::model::candidate::CandidateItem;
use common::toolbar::dictionary;
use common::toolbar::{AnnotationToolbar, ToolbarKey, ToolbarState};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;
use yew::virtual_dom::AttrValue;

use super::dom::render_surface_html;
use super::helpers::{markdown_to_html, source_link};
use super::messages::Msg;
use super::state::EditorComponent;
use crate::components::inline_panel::InlinePanel;
use crate::i18n;

pub fn view(component: &EditorComponent, ctx: &Context<EditorComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="annotator-root">
            { build_toolbar(component, link) }
            { build_tab_bar(component, link) }
            {
                if component.active_tab == "editor" {
                    build_editor_tab(component, link)
                } else {
                    build_html_tab(component)
                }
            }
        </div>
    }
}

/// The inline tool button. It shows the "active" look while the caret is in
/// an annotation, when pressing it removes that annotation.
fn build_toolbar(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let active = component.toolbar.state() == ToolbarState::OpenForExisting;
    let title = format!(
        "{} ({})",
        i18n::t(AnnotationToolbar::TITLE),
        AnnotationToolbar::SHORTCUT
    );

    html! {
        <div class="icon-toolbar">
            <button
                class={classes!("icon-btn", active.then_some("active"))}
                title={title}
                onmousedown={Callback::from(|e: MouseEvent| e.prevent_default())}
                onclick={link.callback(|_| Msg::Surround)}
            >
                <i class="material-icons">{ if active { "format_clear" } else { "bookmark_add" } }</i>
                <span class="icon-label">{ i18n::t(AnnotationToolbar::TITLE) }</span>
            </button>
        </div>
    }
}

fn build_tab_bar(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let tab_class = |tab: &str| {
        classes!("tab-btn", (component.active_tab == tab).then_some("active"))
    };

    html! {
        <div class="tab-bar">
            <button
                class={tab_class("editor")}
                onclick={link.callback(|_| Msg::SetTab("editor".to_string()))}
            >
                {"Editor"}
            </button>
            <button
                class={tab_class("html")}
                onclick={link.callback(|_| Msg::SetTab("html".to_string()))}
            >
                {"HTML"}
            </button>
        </div>
    }
}

fn build_editor_tab(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let surface_html = AttrValue::from(render_surface_html(&component.document));

    html! {
        <>
            <div
                class="editor-surface"
                ref={component.surface_ref.clone()}
                tabindex="0"
                onmouseup={link.callback(|_: MouseEvent| Msg::SelectionChanged)}
                onkeyup={link.callback(|_: KeyboardEvent| Msg::SelectionChanged)}
                onkeydown={link.batch_callback(|e: KeyboardEvent| {
                    if e.ctrl_key() && e.key().eq_ignore_ascii_case("l") {
                        e.prevent_default();
                        vec![Msg::Surround]
                    } else {
                        vec![]
                    }
                })}
            >
                { Html::from_html_unchecked(surface_html) }
            </div>
            <InlinePanel open={component.is_panel_open()} title={i18n::t(dictionary::TITLE)}>
                {
                    match (component.toolbar.state(), component.toolbar.preview()) {
                        (ToolbarState::OpenForNew, _) => build_search_panel(component, link),
                        (ToolbarState::OpenForExisting, Some(metadata)) => build_preview(metadata, link),
                        _ => html! {},
                    }
                }
            </InlinePanel>
            { build_draft_box(component, link) }
        </>
    }
}

fn build_search_panel(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let toolbar = &component.toolbar;
    let highlighted = toolbar.results().highlighted();
    let items = toolbar
        .results()
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| build_candidate(item, index, highlighted == Some(index), link))
        .collect::<Html>();

    html! {
        <div class="annotation-search">
            <div class="annotation-input-row">
                <input
                    type="text"
                    class="annotation-input"
                    ref={component.input_ref.clone()}
                    value={toolbar.input().to_string()}
                    placeholder={i18n::t(toolbar.placeholder_key())}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::InputChanged(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                    onkeydown={link.batch_callback(|e: KeyboardEvent| {
                        if e.key() == "Escape" {
                            e.prevent_default();
                            return vec![Msg::ClosePanel];
                        }
                        match ToolbarKey::from_key_name(&e.key()) {
                            Some(key) => {
                                e.prevent_default();
                                vec![Msg::Key(key)]
                            }
                            None => vec![],
                        }
                    })}
                />
                {
                    if toolbar.is_loading() {
                        html! { <span class="annotation-loading" /> }
                    } else {
                        html! {}
                    }
                }
                <button class="icon-btn" onclick={link.callback(|_| Msg::ClosePanel)}>
                    <i class="material-icons">{"close"}</i>
                </button>
            </div>
            <ul class="annotation-results" onmouseenter={link.callback(|_: MouseEvent| Msg::HoverResults)}>
                { items }
            </ul>
        </div>
    }
}

fn build_candidate(
    item: &CandidateItem,
    index: usize,
    selected: bool,
    link: &Scope<EditorComponent>,
) -> Html {
    html! {
        <li
            class={classes!("annotation-item", selected.then_some("selected"))}
            onmousedown={Callback::from(|e: MouseEvent| e.prevent_default())}
            onclick={link.callback(move |_| Msg::SelectCandidate(index))}
        >
            { color_dot(item.color_dot.as_deref()) }
            <span class="annotation-item-name">{ item.display_name.clone() }</span>
            <span class="annotation-item-source">
                { format!("{} · {}", item.category, item.origin) }
            </span>
        </li>
    }
}

/// Read-only card of the annotation under the caret.
fn build_preview(metadata: &AnnotationMetadata, link: &Scope<EditorComponent>) -> Html {
    let source_line = [metadata.origin.as_deref(), metadata.category.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");
    let description = metadata
        .description
        .as_deref()
        .map(|text| AttrValue::from(markdown_to_html(text)));

    html! {
        <div class="annotation-preview">
            <div class="annotation-preview-title">
                { color_dot(metadata.color_dot.as_deref()) }
                <strong>{ metadata.name.clone() }</strong>
            </div>
            {
                if source_line.is_empty() {
                    html! {}
                } else {
                    html! { <div class="annotation-preview-source">{ source_line }</div> }
                }
            }
            {
                match source_link(metadata.path.as_deref()) {
                    Some(href) => html! {
                        <a class="annotation-preview-link" href={href.to_string()} target="_blank" rel="noopener">
                            { href.to_string() }
                        </a>
                    },
                    None => html! {},
                }
            }
            {
                match description {
                    Some(description) => html! {
                        <div class="markdown-preview">{ Html::from_html_unchecked(description) }</div>
                    },
                    None => html! {},
                }
            }
            <button
                class="icon-btn wide"
                onmousedown={Callback::from(|e: MouseEvent| e.prevent_default())}
                onclick={link.callback(|_| Msg::Surround)}
            >
                <i class="material-icons">{"format_clear"}</i>
                <span class="icon-label">{"Quitar anotación"}</span>
            </button>
        </div>
    }
}

fn color_dot(color: Option<&str>) -> Html {
    match color {
        Some(color) => html! {
            <span class="color-dot" style={format!("background: {};", color)} />
        },
        None => html! {},
    }
}

/// Plain-text box that replaces the whole block, to try the tool on other
/// content.
fn build_draft_box(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    html! {
        <div class="draft-box">
            <textarea
                value={component.draft.clone()}
                rows={3}
                oninput={link.callback(|e: InputEvent| {
                    Msg::UpdateDraft(e.target_unchecked_into::<HtmlTextAreaElement>().value())
                })}
            />
            <button class="icon-btn wide" onclick={link.callback(|_| Msg::ReplaceText)}>
                <i class="material-icons">{"refresh"}</i>
                <span class="icon-label">{"Reemplazar texto"}</span>
            </button>
        </div>
    }
}

/// The saved form of the block.
fn build_html_tab(component: &EditorComponent) -> Html {
    let mut saved = component.document.clone();
    saved.sanitize(&AnnotationToolbar::sanitize());

    html! {
        <pre class="html-preview">{ saved.to_html() }</pre>
    }
}
