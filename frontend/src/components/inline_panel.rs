use uuid::Uuid;
use yew::{classes, html, Component, Context, Html, Properties};

/// Floating container under the editor surface that hosts the tool's
/// actions (the search panel or the preview of an existing annotation).
pub struct InlinePanel {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub open: bool,
    /// Accessible label, read by screen readers when the panel opens.
    pub title: String,
}

impl Component for InlinePanel {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        html! {
            <div
                class={classes!("inline-panel", props.open.then_some("show"))}
                id={self.id.clone()}
                role="dialog"
                aria-label={props.title.clone()}
                aria-hidden={(!props.open).to_string()}
            >
                { props.children.clone() }
            </div>
        }
    }
}
