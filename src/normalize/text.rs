use std::borrow::Cow;

/// Returns a lowercase representation, reusing the original string if already lowercase.
pub fn lowercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_uppercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_lowercase())
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn squash_whitespace(input: &str) -> Cow<'_, str> {
    let squashed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if squashed == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(squashed)
    }
}

/// Capitalizes the first letter of each whitespace-separated word and lowercases the rest.
pub fn title_case(input: &str) -> Cow<'_, str> {
    let mut output = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            output.push(ch);
        } else if at_word_start {
            output.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            output.extend(ch.to_lowercase());
        }
    }
    if output == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(output)
    }
}
