//! Sentence generator backed by a fixed word corpus.

use rand::Rng;

/// Minimum number of words in a generated sentence.
pub const MIN_WORDS_COUNT: usize = 3;

/// Maximum number of words in a generated sentence.
pub const MAX_WORDS_COUNT: usize = 10;

/// Fallback corpus the words are drawn from.
pub const ABSTRACT_TEXT: &str = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do \
     eiusmod tempor incididunt ut labore et dolore magna aliqua ut enim ad minim veniam quis \
     nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat duis aute irure \
     dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur \
     excepteur sint occaecat cupidatat non proident sunt in culpa qui officia deserunt mollit \
     anim id est laborum";

/// Generate a sentence of 3–10 corpus words, first word capitalized, ending in a period.
pub fn generate_string<R: Rng + ?Sized>(rng: &mut R) -> String {
    let words: Vec<&str> = ABSTRACT_TEXT.split_whitespace().collect();
    let count = rng.random_range(MIN_WORDS_COUNT..=MAX_WORDS_COUNT);

    let mut picked: Vec<String> = Vec::with_capacity(count);
    for i in 0..count {
        let word = words[rng.random_range(0..words.len())];
        picked.push(if i == 0 {
            capitalize(word)
        } else {
            word.to_string()
        });
    }

    let mut sentence = picked.join(" ");
    sentence.push('.');
    sentence
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
