use std::collections::HashMap;

/// Damerau-Levenshtein distance between two strings, in characters.
///
/// Insertions, deletions, substitutions and transpositions of adjacent
/// characters each cost one. This is the unrestricted variant: a transposed
/// pair may be edited again, so `"ca"` -> `"abc"` is 2.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a.len(), b.len());

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    // Row/column 0 hold the sentinel so that a transposition can never reach
    // outside the strings.
    let max_dist = len_a + len_b;
    let cols = len_b + 2;
    let mut d = vec![0usize; (len_a + 2) * cols];
    let at = |i: usize, j: usize| i * cols + j;

    d[at(0, 0)] = max_dist;
    for i in 0..=len_a {
        d[at(i + 1, 0)] = max_dist;
        d[at(i + 1, 1)] = i;
    }
    for j in 0..=len_b {
        d[at(0, j + 1)] = max_dist;
        d[at(1, j + 1)] = j;
    }

    // Last row of `a` in which each character was seen.
    let mut last_row: HashMap<char, usize> = HashMap::new();

    for i in 1..=len_a {
        let mut last_match_col = 0;
        for j in 1..=len_b {
            let i1 = last_row.get(&b[j - 1]).copied().unwrap_or(0);
            let j1 = last_match_col;

            let cost = if a[i - 1] == b[j - 1] {
                last_match_col = j;
                0
            } else {
                1
            };

            let substitution = d[at(i, j)] + cost;
            let insertion = d[at(i + 1, j)] + 1;
            let deletion = d[at(i, j + 1)] + 1;
            let transposition = d[at(i1, j1)] + (i - i1 - 1) + 1 + (j - j1 - 1);

            d[at(i + 1, j + 1)] = substitution.min(insertion).min(deletion).min(transposition);
        }
        last_row.insert(a[i - 1], i);
    }

    d[at(len_a + 1, len_b + 1)]
}
