use crate::error::AnnotatorError;
use crate::model::candidate::CandidateItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Previous,
}

/// The rendered candidate list and its keyboard highlight.
///
/// This is the source of truth for what is displayed; the DOM only mirrors
/// it. At most one item is highlighted at any time.
#[derive(Debug, Clone, Default)]
pub struct ResultListController {
    items: Vec<CandidateItem>,
    highlighted: Option<usize>,
}

impl ResultListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CandidateItem] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces the list with the per-source results, flattened in order.
    pub fn render(&mut self, per_source: Vec<Vec<CandidateItem>>) {
        self.items = per_source.into_iter().flatten().collect();
        self.highlighted = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.highlighted = None;
    }

    /// Moves the highlight one step, wrapping around at both ends. From no
    /// highlight, `Next` lands on the first item and `Previous` on the last.
    pub fn navigate(&mut self, direction: NavDirection) {
        let len = self.items.len();
        if len == 0 {
            return;
        }

        self.highlighted = Some(match (self.highlighted, direction) {
            (None, NavDirection::Next) => 0,
            (None, NavDirection::Previous) => len - 1,
            (Some(index), NavDirection::Next) => (index + 1) % len,
            (Some(index), NavDirection::Previous) => (index + len - 1) % len,
        });
    }

    /// Mouse over the list: the keyboard highlight goes away.
    pub fn hover(&mut self) {
        self.highlighted = None;
    }

    pub fn select(&self, index: usize) -> Option<&CandidateItem> {
        self.items.get(index)
    }

    /// Picks the item to commit for the typed `query`.
    ///
    /// The highlighted item wins. Without one, the query must name the first
    /// candidate's index key, ignoring case and surrounding blanks.
    pub fn commit(&self, query: &str) -> Result<CandidateItem, AnnotatorError> {
        if let Some(item) = self.highlighted.and_then(|index| self.items.get(index)) {
            return Ok(item.clone());
        }

        let typed = query.trim().to_lowercase();
        match self.items.first() {
            Some(first) if !typed.is_empty() && first.record_key.to_lowercase() == typed => {
                Ok(first.clone())
            }
            _ => Err(AnnotatorError::InvalidSelection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str) -> CandidateItem {
        CandidateItem {
            display_name: key.to_uppercase(),
            display_description: None,
            record_key: key.to_string(),
            category: "Condition".into(),
            origin: "SRD".into(),
            color_dot: None,
            text_color: None,
            font_style: None,
            source_path: "conditions.json".into(),
        }
    }

    fn list(len: usize) -> ResultListController {
        let mut controller = ResultListController::new();
        controller.render(vec![(0..len).map(|i| item(&format!("item{i}"))).collect()]);
        controller
    }

    #[test]
    fn test_render_flattens_sources_and_resets_highlight() {
        let mut controller = ResultListController::new();
        controller.render(vec![vec![item("bless")], vec![], vec![item("blinded"), item("blight")]]);
        controller.navigate(NavDirection::Next);

        controller.render(vec![vec![item("bless")], vec![item("blinded")]]);
        let keys: Vec<_> = controller.items().iter().map(|i| i.record_key.as_str()).collect();
        assert_eq!(keys, vec!["bless", "blinded"]);
        assert_eq!(controller.highlighted(), None);
    }

    #[test]
    fn test_navigation_is_cyclic_for_all_lengths() {
        for len in 0..=6 {
            let mut controller = list(len);
            controller.navigate(NavDirection::Next);
            let first = controller.highlighted();
            assert_eq!(first, (len > 0).then_some(0));

            for _ in 0..len {
                controller.navigate(NavDirection::Next);
            }
            assert_eq!(controller.highlighted(), first, "len {len}");

            for _ in 0..len {
                controller.navigate(NavDirection::Previous);
            }
            assert_eq!(controller.highlighted(), first, "len {len}");
        }
    }

    #[test]
    fn test_previous_from_nothing_wraps_to_last() {
        let mut controller = list(3);
        controller.navigate(NavDirection::Previous);
        assert_eq!(controller.highlighted(), Some(2));
        controller.navigate(NavDirection::Next);
        assert_eq!(controller.highlighted(), Some(0));
    }

    #[test]
    fn test_single_highlight_under_mixed_input() {
        let mut controller = list(4);
        let steps = [
            Some(NavDirection::Next),
            Some(NavDirection::Next),
            None,
            Some(NavDirection::Previous),
            Some(NavDirection::Previous),
            None,
            None,
            Some(NavDirection::Next),
        ];
        for step in steps {
            match step {
                Some(direction) => {
                    controller.navigate(direction);
                    assert!(controller.highlighted().is_some_and(|i| i < 4));
                }
                None => {
                    controller.hover();
                    assert_eq!(controller.highlighted(), None);
                }
            }
        }
    }

    #[test]
    fn test_commit_prefers_highlighted_item() {
        let mut controller = list(3);
        controller.navigate(NavDirection::Previous);
        assert_eq!(controller.commit("whatever").unwrap().record_key, "item2");
    }

    #[test]
    fn test_commit_exact_match_on_first_key() {
        let mut controller = ResultListController::new();
        controller.render(vec![vec![item("blinded"), item("blight")]]);

        assert_eq!(controller.commit(" Blinded ").unwrap().record_key, "blinded");
        assert_eq!(controller.commit("blight"), Err(AnnotatorError::InvalidSelection));
        assert_eq!(controller.commit("blin"), Err(AnnotatorError::InvalidSelection));
    }

    #[test]
    fn test_commit_with_empty_input_is_invalid() {
        let controller = ResultListController::new();
        assert_eq!(controller.commit(""), Err(AnnotatorError::InvalidSelection));
        assert_eq!(list(2).commit("   "), Err(AnnotatorError::InvalidSelection));
    }
}
