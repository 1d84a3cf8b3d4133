//! Annotation editor: a single block of inline text hosting the annotation
//! tool, split in submodules for state, messages, update logic and view.
//!
//! On first render the tool configuration is fetched from the server. If
//! that fails the editor keeps working without sources and says so in a
//! toast (in Spanish, like the rest of the interface).

use log::{info, warn};
use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::datasource::ToolConfig;

mod dom;
mod fetch;
mod helpers;
mod host;
mod messages;
mod props;
mod state;
mod update;
mod view;

use helpers::show_toast;
pub use messages::Msg;
pub use props::EditorProps;
pub use state::EditorComponent;

impl Component for EditorComponent {
    type Message = Msg;
    type Properties = EditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        EditorComponent::new(ctx.props().initial_text.as_deref())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let link = ctx.link().clone();
            let url = ctx.props().config_url.clone();
            spawn_local(async move {
                match fetch::load_tool_config(&url).await {
                    Ok(config) => {
                        info!("{} annotation sources configured", config.files_to_search.len());
                        link.send_message(Msg::ConfigLoaded(config));
                    }
                    Err(e) => {
                        warn!("cannot load the tool configuration: {}", e);
                        link.send_message(Msg::ConfigLoaded(ToolConfig::default()));
                        show_toast("No se pudo cargar la configuración de anotaciones.", true);
                    }
                }
            });
        }

        if self.sync_selection {
            self.sync_selection = false;
            if let Some(surface) = self.surface_ref.cast::<web_sys::Element>() {
                dom::select_document_range(&surface, &self.document);
            }
        }

        if self.focus_input {
            self.focus_input = false;
            if let Some(input) = self.input_ref.cast::<web_sys::HtmlInputElement>() {
                input.focus().ok();
            }
        }
    }
}
