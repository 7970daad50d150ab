use crate::checker::dictionary::Dictionary;
use crate::checker::distance::levenshtein_distance;
use std::cmp::Reverse;
use std::collections::HashSet;

const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Maximum number of primitive edits explored around a misspelling.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Words longer than this (in characters) only get single-edit candidates;
/// the second level grows quadratically with length.
pub const MAX_SECOND_EDIT_LEN: usize = 20;

/// Rank dictionary words close to `word` (already lowercased).
///
/// Candidates within [`MAX_EDIT_DISTANCE`] edits are found by generating
/// edits and probing the dictionary, then ordered by exact Damerau-Levenshtein
/// distance and, for equal distance, by descending frequency. Remaining ties
/// fall back to alphabetical order.
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    if max_suggestions == 0 || dictionary.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, u64, String)> = edit_candidates(word, dictionary)
        .into_iter()
        .map(|candidate| {
            let distance = levenshtein_distance(word, &candidate);
            let frequency = dictionary.frequency(&candidate).unwrap_or(0);
            (distance, frequency, candidate)
        })
        .collect();

    ranked.sort_by(|a, b| {
        (a.0, Reverse(a.1), &a.2).cmp(&(b.0, Reverse(b.1), &b.2))
    });
    ranked.truncate(max_suggestions);

    ranked.into_iter().map(|(_, _, word)| word).collect()
}

/// Every dictionary word reachable from `word` in at most two edits,
/// including `word` itself. Past [`MAX_SECOND_EDIT_LEN`] only one edit.
pub(crate) fn edit_candidates(word: &str, dictionary: &Dictionary) -> HashSet<String> {
    let mut found = HashSet::new();
    if dictionary.contains(word) {
        found.insert(word.to_string());
    }

    let first = single_edits(word);
    for edit in &first {
        if dictionary.contains(edit) {
            found.insert(edit.clone());
        }
    }

    if word.chars().count() > MAX_SECOND_EDIT_LEN {
        return found;
    }

    // Second-level edits are probed straight against the dictionary rather
    // than collected, since there are orders of magnitude more of them.
    for edit in &first {
        for second in single_edits(edit) {
            if dictionary.contains(&second) {
                found.insert(second);
            }
        }
    }

    found
}

/// All strings one deletion, adjacent transposition, substitution or
/// insertion away from `word`.
pub(crate) fn single_edits(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = HashSet::with_capacity(chars.len() * 54 + 26);

    // Deletions
    for i in 0..chars.len() {
        let mut new_word = chars.clone();
        new_word.remove(i);
        edits.insert(new_word.into_iter().collect());
    }

    // Transpositions (swap adjacent)
    for i in 0..chars.len().saturating_sub(1) {
        let mut new_word = chars.clone();
        new_word.swap(i, i + 1);
        edits.insert(new_word.into_iter().collect());
    }

    // Substitutions
    for i in 0..chars.len() {
        for &letter in ALPHABET {
            if chars[i] != letter {
                let mut new_word = chars.clone();
                new_word[i] = letter;
                edits.insert(new_word.into_iter().collect());
            }
        }
    }

    // Insertions
    for i in 0..=chars.len() {
        for &letter in ALPHABET {
            let mut new_word = chars.clone();
            new_word.insert(i, letter);
            edits.insert(new_word.into_iter().collect());
        }
    }

    edits.remove(word);
    edits
}

/// Give `suggestion` the leading-character case of `original`.
pub fn match_case(original: &str, suggestion: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return suggestion.to_string();
    }

    let mut chars = suggestion.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::dictionary::FrequencyTable;

    fn dictionary(entries: &[(&str, u64)]) -> Dictionary {
        let table: FrequencyTable = entries
            .iter()
            .map(|(word, count)| (word.to_string(), *count))
            .collect();
        Dictionary::from_words(entries.iter().map(|(word, _)| *word), Some(&table)).unwrap()
    }

    #[test]
    fn test_single_edits() {
        let edits = single_edits("hello");
        assert!(edits.contains("hllo")); // deletion
        assert!(edits.contains("ehllo")); // transposition
        assert!(edits.contains("jello")); // substitution
        assert!(edits.contains("helloo")); // insertion
        assert!(!edits.contains("hello"));
    }

    #[test]
    fn test_candidates_within_two_edits() {
        let dict = dictionary(&[("quick", 1), ("quack", 1), ("quicker", 1), ("slow", 1)]);
        let found = edit_candidates("qick", &dict);
        assert!(found.contains("quick"));
        assert!(found.contains("quack"));
        assert!(!found.contains("quicker"));
        assert!(!found.contains("slow"));
    }

    #[test]
    fn test_long_words_get_single_edits_only() {
        let long = "internationalizations"; // 21 letters
        let dict = dictionary(&[(long, 1), ("internationalisation", 1)]);

        // One transposition away.
        assert!(edit_candidates("internationalizatiosn", &dict).contains(long));
        // One deletion and one insertion away.
        assert!(!edit_candidates("internationalizatinsx", &dict).contains(long));

        // Short words still reach two edits.
        let dict = dictionary(&[("quick", 1)]);
        assert!(edit_candidates("qicky", &dict).contains("quick"));
    }

    #[test]
    fn test_distance_then_frequency_ordering() {
        let dict = dictionary(&[("cat", 5), ("bat", 1), ("cut", 1)]);
        let suggestions = generate("cbt", &dict, 3);
        assert_eq!(suggestions[0], "cat");
        // "cut" is one edit away, "bat" two.
        assert_eq!(suggestions, vec!["cat", "cut", "bat"]);
    }

    #[test]
    fn test_frequency_breaks_distance_ties() {
        let dict = dictionary(&[("kick", 2), ("quick", 50), ("sick", 9)]);
        assert_eq!(generate("qick", &dict, 1), vec!["quick"]);
        assert_eq!(generate("qick", &dict, 3), vec!["quick", "sick", "kick"]);
    }

    #[test]
    fn test_no_candidates() {
        let dict = dictionary(&[("elephant", 1)]);
        assert!(generate("zzz", &dict, 3).is_empty());
        assert!(generate("elephnt", &dict, 0).is_empty());
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("Helo", "hello"), "Hello");
        assert_eq!(match_case("helo", "hello"), "hello");
        assert_eq!(match_case("Émile", "émile"), "Émile");
        assert_eq!(match_case("", "word"), "word");
    }
}
