//! Prefix trie of the words seen in a document, feeding autocomplete.

/// Minimum word length worth remembering.
pub const MIN_WORD_LEN: usize = 3;

/// Identifier-like words of `text`: runs of letters and underscores at
/// least [`MIN_WORD_LEN`] characters long.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| ch != '_' && !ch.is_alphabetic())
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
}

/// A trie node. The root holds no character.
#[derive(Debug, Default, Clone)]
pub struct DocumentVocabulary {
    ch: char,
    /// Times a word ending at this node was registered.
    count: usize,
    children: Vec<DocumentVocabulary>,
}

impl DocumentVocabulary {
    /// Record one occurrence of `word`.
    pub fn register_word(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let mut node = self;
        for ch in word.chars() {
            if !node.children.iter().any(|child| child.ch == ch) {
                node.children.push(Self {
                    ch,
                    ..Self::default()
                });
            }
            let Some(child) = node.children.iter_mut().find(|child| child.ch == ch) else {
                return;
            };
            node = child;
        }
        node.count += 1;
    }

    /// Whether `word` was registered.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.find_node(word).is_some_and(|node| node.count > 0)
    }

    /// Registered words starting with `prefix`, most frequent first, ties in
    /// alphabetical order.
    #[must_use]
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.find_node(prefix) else {
            return Vec::new();
        };

        let mut found: Vec<(usize, String)> = Vec::new();
        let mut pending: Vec<(&Self, String)> = vec![(start, prefix.to_owned())];
        while let Some((node, word)) = pending.pop() {
            if node.count > 0 {
                found.push((node.count, word.clone()));
            }
            for child in &node.children {
                let mut child_word = word.clone();
                child_word.push(child.ch);
                pending.push((child, child_word));
            }
        }

        found.sort_by(|(count_a, word_a), (count_b, word_b)| {
            count_b.cmp(count_a).then_with(|| word_a.cmp(word_b))
        });
        found.into_iter().map(|(_, word)| word).collect()
    }

    fn find_node(&self, prefix: &str) -> Option<&Self> {
        prefix.chars().try_fold(self, |node, ch| {
            node.children.iter().find(|child| child.ch == ch)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::identifiers("let my_var = other(x);", vec!["let", "my_var", "other"])]
    #[case::digits_split("abc1def", vec!["abc", "def"])]
    #[case::unicode("naïve straße", vec!["naïve", "straße"])]
    #[case::short_words("a bb ccc", vec!["ccc"])]
    fn words_are_identifier_runs(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(words(text).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prefix_lookup_orders_by_frequency() {
        let mut vocabulary = DocumentVocabulary::default();
        for word in ["compute", "counter", "counter", "cat", "count"] {
            vocabulary.register_word(word);
        }

        assert_eq!(
            vocabulary.words_with_prefix("co"),
            vec!["counter", "compute", "count"]
        );
        assert_eq!(vocabulary.words_with_prefix("cat"), vec!["cat"]);
        assert!(vocabulary.words_with_prefix("dog").is_empty());
    }

    #[test]
    fn prefixes_are_not_words() {
        let mut vocabulary = DocumentVocabulary::default();
        vocabulary.register_word("counter");
        assert!(vocabulary.contains("counter"));
        assert!(!vocabulary.contains("count"));
    }
}
