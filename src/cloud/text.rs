//! Text normalization, stopword filtering and word counting.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Generic English stopwords, the classic word-cloud list.
pub const GENERIC_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't",
    "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during", "each",
    "else", "ever", "few", "for", "from", "further", "get", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he", "he'd", "he'll", "he's", "hence", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "however", "http",
    "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its",
    "itself", "just", "k", "let's", "like", "me", "more", "most", "mustn't", "my", "myself",
    "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "otherwise",
    "ought", "our", "ours", "ourselves", "out", "over", "own", "r", "same", "shall", "shan't",
    "she", "she'd", "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "there's", "therefore", "these", "they", "they'd", "they'll", "they're", "they've",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "wasn't",
    "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when",
    "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's",
    "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll", "you're",
    "you've", "your", "yours", "yourself", "yourselves",
];

/// Interjections and filler verbs common in lyrics.
pub const FILLER_WORDS: &[&str] = &[
    "oh", "yeah", "la", "na", "ooh", "ah", "eh", "mm", "mmm", "uh", "um", "like", "get", "got",
    "know", "go", "going", "gone", "gonna", "wanna", "gotta", "cause",
];

lazy_static! {
    /// Union of generic stopwords and lyric filler.
    static ref STOPWORDS: HashSet<&'static str> =
        GENERIC_STOPWORDS.iter().chain(FILLER_WORDS).copied().collect();
}

/// Anything that is neither a word character nor whitespace.
#[allow(clippy::expect_used)]
static RE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s]").expect("valid regex: RE_PUNCTUATION")
});

/// Tokens starting with a word character; single letters count.
#[allow(clippy::expect_used)]
static RE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w[\w']*").expect("valid regex: RE_WORD")
});

/// A word and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    /// Normalized word.
    pub word: String,
    /// Occurrences after plural folding.
    pub count: usize,
}

/// Lowercase the text and drop punctuation.
pub fn normalize(text: &str) -> String {
    RE_PUNCTUATION.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Whether a normalized word is excluded from counting.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Normalize and tokenize text, keeping stopwords, order and repeats.
///
/// Purely numeric tokens are dropped.
pub fn tokens(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    RE_WORD
        .find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|w| !w.chars().all(char::is_numeric))
        .map(String::from)
        .collect()
}

/// Normalize, tokenize and filter text, keeping order and repeats.
///
/// Purely numeric tokens and stopwords are dropped.
pub fn significant_words(text: &str) -> Vec<String> {
    tokens(text).into_iter().filter(|w| !is_stopword(w)).collect()
}

/// Per-word tally: count and index of first occurrence.
type Tally = HashMap<String, (i64, usize)>;

fn tally<'a>(words: impl IntoIterator<Item = &'a str>) -> Tally {
    let mut counts = Tally::new();
    for (idx, word) in words.into_iter().enumerate() {
        counts.entry(word.to_string()).or_insert((0, idx)).0 += 1;
    }
    counts
}

/// Fold plurals into singulars that also occur.
///
/// Returns the plural-to-singular mapping applied.
fn fold_plurals(counts: &mut Tally) -> HashMap<String, String> {
    let plurals: Vec<String> = counts
        .keys()
        .filter(|w| w.ends_with('s') && !w.ends_with("ss"))
        .filter(|w| counts.contains_key(&w[..w.len() - 1]))
        .cloned()
        .collect();

    let mut folded = HashMap::new();
    for plural in plurals {
        let singular = plural[..plural.len() - 1].to_string();
        if let Some((extra, _)) = counts.remove(&plural) {
            if let Some(entry) = counts.get_mut(&singular) {
                entry.0 += extra;
            }
        }
        folded.insert(plural, singular);
    }
    folded
}

fn rank(counts: Tally) -> Vec<WordFrequency> {
    let mut ranked: Vec<(String, i64, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count > 0)
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(word, count, _)| WordFrequency {
            word,
            count: usize::try_from(count).unwrap_or(0),
        })
        .collect()
}

/// Count significant words, most frequent first.
///
/// A plural ending in `s` (but not `ss`) is folded into its singular when
/// the singular also occurs. Ties keep first-occurrence order, so the result
/// is fully determined by the input text.
pub fn word_frequencies(text: &str) -> Vec<WordFrequency> {
    let words = significant_words(text);
    let mut counts = tally(words.iter().map(String::as_str));
    fold_plurals(&mut counts);
    rank(counts)
}

/// `k log x + (n - k) log (1 - x)`, with both logs floored.
fn log_likelihood(k: f64, n: f64, x: f64) -> f64 {
    k.mul_add(x.max(1e-10).ln(), (n - k) * (1.0 - x).max(1e-10).ln())
}

/// Dunning likelihood-ratio score for a word pair.
///
/// `pair` is how often the pair occurs, `first` and `second` how often each
/// word occurs, `total` the number of significant words.
pub fn collocation_score(pair: f64, first: f64, second: f64, total: f64) -> f64 {
    if total <= first || total <= second {
        return 0.0;
    }
    let p = second / total;
    let p1 = pair / first;
    let p2 = (second - pair) / (total - first);
    let score = log_likelihood(pair, first, p) + log_likelihood(second - pair, total - first, p)
        - log_likelihood(pair, first, p1)
        - log_likelihood(second - pair, total - first, p2);
    -2.0 * score
}

/// Count words and frequent two-word phrases, most frequent first.
///
/// Adjacent pairs are taken before stopwords are removed, and a pair
/// containing a stopword is never a phrase. A pair scoring above `threshold`
/// is counted as one entry (`"love story"`) and its count is taken off both
/// words; words left with nothing are dropped. Phrases rank after single
/// words of equal count.
pub fn collocated_frequencies(text: &str, threshold: f64) -> Vec<WordFrequency> {
    let all = tokens(text);
    let words: Vec<&str> = all.iter().map(String::as_str).filter(|w| !is_stopword(w)).collect();
    let total = words.len() as f64;

    let mut counts = tally(words.iter().copied());
    let folded = fold_plurals(&mut counts);
    let single = counts.clone();
    let standard = |w: &str| folded.get(w).cloned().unwrap_or_else(|| w.to_string());

    let pairs: Vec<String> = all
        .windows(2)
        .filter(|pair| !is_stopword(&pair[0]) && !is_stopword(&pair[1]))
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();
    let mut pair_counts: Vec<(String, (i64, usize))> =
        tally(pairs.iter().map(String::as_str)).into_iter().collect();
    pair_counts.sort_by_key(|(_, (_, first))| *first);

    for (phrase, (count, first)) in pair_counts {
        let Some((a, b)) = phrase.split_once(' ') else {
            continue;
        };
        let (left, right) = (standard(a), standard(b));
        let (Some(&(left_count, _)), Some(&(right_count, _))) = (single.get(&left), single.get(&right)) else {
            continue;
        };

        let score = collocation_score(count as f64, left_count as f64, right_count as f64, total);
        if score > threshold {
            tracing::debug!("Counting '{phrase}' as a phrase (score {score:.1})");
            for word in [&left, &right] {
                if let Some(entry) = counts.get_mut(word) {
                    entry.0 -= count;
                }
            }
            counts.insert(phrase, (count, all.len() + first));
        }
    }

    rank(counts)
}
