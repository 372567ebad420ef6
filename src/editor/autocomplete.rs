//! Word completion from the document vocabulary.

use iedit_document::{CharacterIndexable, DocumentVocabulary};

/// Completions for the word being typed.
#[derive(Debug, Default, Clone)]
pub struct Autocomplete {
    choices: Vec<String>,
    selected_idx: usize,
    /// Characters of the word already typed.
    written_offset: usize,
    is_open: bool,
}

impl Autocomplete {
    /// Recompute the choices for `prefix`, leaving out the prefix itself.
    pub fn update(&mut self, vocabulary: &DocumentVocabulary, prefix: &str) {
        self.selected_idx = 0;
        self.written_offset = prefix.n_chars();
        self.choices = if prefix.is_empty() {
            Vec::new()
        } else {
            vocabulary
                .words_with_prefix(prefix)
                .into_iter()
                .filter(|word| word != prefix)
                .collect()
        };
    }

    /// Show the popup when there is something to offer.
    pub fn open(&mut self) {
        self.is_open = !self.choices.is_empty();
    }

    /// Hide the popup.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Whether the popup is showing choices.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open && !self.choices.is_empty()
    }

    /// Select the next choice, wrapping to the first.
    pub fn select_next(&mut self) {
        if !self.choices.is_empty() {
            self.selected_idx = (self.selected_idx + 1).rem_euclid(self.choices.len());
        }
    }

    /// Select the previous choice.
    pub const fn select_previous(&mut self) {
        self.selected_idx = self.selected_idx.saturating_sub(1);
    }

    /// Index of the selected choice.
    #[must_use]
    pub const fn selected_idx(&self) -> usize {
        self.selected_idx
    }

    /// Up to `max_choices` choices around the selection, with the index of
    /// the first one shown.
    #[must_use]
    pub fn visible_choices(&self, max_choices: usize) -> (usize, &[String]) {
        let start = (self.selected_idx + 1)
            .saturating_sub(max_choices)
            .min(self.choices.len().saturating_sub(max_choices));
        let end = (start + max_choices).min(self.choices.len());
        (start, self.choices.get(start..end).unwrap_or_default())
    }

    /// The untyped rest of the selected choice, closing the popup.
    pub fn take_selected_suffix(&mut self) -> Option<String> {
        self.is_open = false;
        let choice = self.choices.get(self.selected_idx)?;
        let suffix: String = choice.chars().skip(self.written_offset).collect();
        self.choices.clear();
        (!suffix.is_empty()).then_some(suffix)
    }
}
