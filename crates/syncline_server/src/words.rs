//! Frequency-ranked prefix suggestions.

/// A dictionary of words with usage frequencies, queried by prefix.
///
/// Lookups are case-insensitive and return the most frequent matches
/// first, ties broken alphabetically so results are stable.
#[derive(Debug, Clone)]
pub struct SuggestionIndex {
    entries: Vec<(String, u64)>,
}

impl SuggestionIndex {
    /// Creates an index from `(word, frequency)` entries.
    pub fn with_entries(entries: &[(&str, u64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(word, freq)| (word.to_lowercase(), *freq))
                .collect(),
        }
    }

    /// A small built-in dictionary of common words.
    pub fn common_words() -> Self {
        Self::with_entries(&[
            ("the", 1000),
            ("of", 996),
            ("and", 993),
            ("can", 990),
            ("to", 985),
            ("in", 980),
            ("is", 975),
            ("was", 970),
            ("that", 965),
            ("cat", 950),
            ("for", 940),
            ("it", 930),
            ("with", 920),
            ("as", 910),
            ("his", 900),
            ("car", 880),
            ("on", 870),
            ("be", 860),
            ("at", 850),
            ("by", 840),
            ("case", 820),
            ("had", 810),
            ("not", 800),
            ("call", 790),
            ("are", 780),
            ("care", 760),
            ("but", 750),
            ("from", 740),
            ("or", 720),
            ("have", 710),
            ("catch", 700),
            ("an", 690),
            ("they", 680),
            ("which", 660),
            ("came", 640),
            ("one", 620),
            ("you", 600),
            ("were", 580),
            ("all", 560),
            ("her", 540),
            ("she", 520),
            ("there", 500),
            ("would", 480),
            ("their", 460),
            ("category", 410),
            ("carbon", 340),
            ("cattle", 300),
            ("catalog", 260),
            ("carpet", 220),
            ("cascade", 180),
        ])
    }

    /// Returns up to `limit` completions for `prefix`, most frequent
    /// first.
    ///
    /// An empty prefix has no word under the caret and matches nothing.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let prefix = prefix.to_lowercase();

        let mut matches: Vec<&(String, u64)> = self
            .entries
            .iter()
            .filter(|(word, _)| word.starts_with(&prefix))
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches
            .into_iter()
            .take(limit)
            .map(|(word, _)| word.clone())
            .collect()
    }
}

impl Default for SuggestionIndex {
    fn default() -> Self {
        Self::common_words()
    }
}
