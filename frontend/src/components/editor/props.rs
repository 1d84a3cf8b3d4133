use yew::prelude::*;
use yew::virtual_dom::AttrValue;

#[derive(Properties, PartialEq, Clone)]
pub struct EditorProps {
    /// Text of the block when the editor mounts. Defaults to a short sample.
    #[prop_or_default]
    pub initial_text: Option<String>,

    /// Where the tool configuration is loaded from on first render.
    #[prop_or(AttrValue::Static("/api/config"))]
    pub config_url: AttrValue,
}
