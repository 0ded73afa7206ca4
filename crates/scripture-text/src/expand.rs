//! Static topic expansion for broad questions.
//!
//! A query that mentions a topic phrase, or one of the topic's synonyms, gets
//! every synonym of that topic appended once. Nothing is learned; the lexicon
//! is compiled in and lower-case.

pub static EXPANSIONS: &[(&str, &[&str])] = &[
    ("meaning of life", &["purpose", "moksha", "puruṣārtha", "artha", "dharma", "kāma"]),
    ("self", &["ātman", "soul", "puruṣa"]),
    ("god", &["brahman", "īśvara", "deva", "paramātman"]),
    ("duty", &["dharma", "svadharma", "karma-yoga"]),
    ("desireless action", &["niṣkāma karma", "karma-yoga", "anāśritaḥ karma-phalam"]),
    ("liberation", &["moksha", "mukti", "nirvāṇa"]),
    ("knowledge", &["jñāna", "vidyā", "brahma-vidyā"]),
    ("devotion", &["bhakti", "śraddhā"]),
    ("action", &["karma", "karma-yoga"]),
];

/// Append the synonyms of every matching topic to `query`.
///
/// The original text is kept verbatim as the prefix. A synonym already present
/// as whole words, in the query or inside a synonym appended earlier in the
/// same call, is not appended again, so expanding an expanded query never
/// duplicates a term. Returns `query` unchanged when nothing matches.
pub fn expand(query: &str) -> String {
    let lower = query.to_lowercase();
    // Words of the query plus every synonym appended so far.
    let mut words: Vec<&str> = split_words(&lower).collect();

    let mut added: Vec<&str> = Vec::new();
    for &(topic, synonyms) in EXPANSIONS {
        let matched = lower.contains(topic) || synonyms.iter().any(|s| lower.contains(s));
        if !matched {
            continue;
        }
        for &synonym in synonyms {
            if !contains_phrase(&words, synonym) {
                added.push(synonym);
                words.extend(split_words(synonym));
            }
        }
    }

    if added.is_empty() {
        return query.to_string();
    }
    format!("{} {}", query, added.join(" "))
}

fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
}

fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words.windows(needle.len()).any(|w| w == needle.as_slice())
}
