mod app;
mod components;
mod i18n;
mod logging;

use app::App;

fn main() {
    logging::init(log::LevelFilter::Debug);
    yew::Renderer::<App>::new().render();
}
