use common::model::datasource::ToolConfig;
use common::search::sequencer::SearchTicket;
use common::search::QueryResults;
use common::toolbar::ToolbarKey;

pub enum Msg {
    SetTab(String),
    ConfigLoaded(ToolConfig),
    /// The browser selection inside the surface may have changed.
    SelectionChanged,
    /// Tool button or `Ctrl+L`.
    Surround,
    ClosePanel,
    InputChanged(String),
    /// The debounce timer of a ticket fired.
    RunSearch(SearchTicket),
    SearchFinished(SearchTicket, QueryResults),
    Key(ToolbarKey),
    HoverResults,
    SelectCandidate(usize),
    UpdateDraft(String),
    ReplaceText,
}
