pub mod editor;
pub mod inline_panel;
