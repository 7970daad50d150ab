/// Split text into alternating word and whitespace tokens.
///
/// Every token is either a maximal run of whitespace or a maximal run of
/// non-whitespace, so punctuation stays attached to the word it touches and
/// concatenating the tokens gives back the input.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None;

    for (idx, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        match in_whitespace {
            Some(prev) if prev != ws => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_whitespace = Some(ws);
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

pub(crate) fn is_whitespace_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}
