use std::collections::HashMap;

use scraper::{Html, Selector};

const HEADLINE_SELECTOR: &str = "h3";

/// Tokens shorter than this carry no signal in headline text.
const MIN_WORD_LEN: usize = 3;

// Common English stopwords, matching the usual corpus lists closely enough
// for headline mining.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "and", "any", "are", "aren",
    "because", "been", "before", "being", "below", "between", "both", "but", "can",
    "cannot", "could", "couldn", "did", "didn", "does", "doesn", "doing", "don", "down",
    "during", "each", "few", "for", "from", "further", "had", "hadn", "has", "hasn",
    "have", "haven", "having", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "into", "isn", "its", "itself", "just", "more", "most", "mustn", "myself",
    "nor", "not", "now", "off", "once", "only", "other", "our", "ours", "ourselves",
    "out", "over", "own", "same", "shan", "she", "should", "shouldn", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "too", "under", "until", "very", "was",
    "wasn", "were", "weren", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "won", "would", "wouldn", "you", "your", "yours", "yourself",
    "yourselves",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopWord {
    pub word: String,
    pub count: usize,
}

/// Scrapes headline text from a page and reports the most frequent words
/// after stopword removal.
pub struct WordMiner {
    headline_selector: Selector,
}

impl Default for WordMiner {
    fn default() -> Self {
        Self::new()
    }
}

impl WordMiner {
    pub fn new() -> Self {
        Self {
            headline_selector: Selector::parse(HEADLINE_SELECTOR).unwrap(),
        }
    }

    pub fn headlines(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.headline_selector)
            .map(|h| {
                h.text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|h| !h.is_empty())
            .collect()
    }

    /// Counts the surviving tokens and returns the `top` most frequent,
    /// ties broken alphabetically so the ranking is deterministic.
    pub fn top_words(&self, text: &str, top: usize) -> Vec<TopWord> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }

        let mut ranked: Vec<TopWord> = counts
            .into_iter()
            .map(|(word, count)| TopWord { word, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        ranked.truncate(top);
        ranked
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .map(str::to_ascii_lowercase)
        .filter(|w| w.len() >= MIN_WORD_LEN && !STOPWORDS.contains(&w.as_str()))
}
