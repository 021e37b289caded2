pub const MIN_INPUT_WORDS: usize = 10;

const ALLOWED_PUNCTUATION: [char; 15] = [
    '.', ',', '!', '?', ';', ':', '-', '(', ')', '[', ']', '{', '}', '"', '\'',
];

/// Clean raw input before it is embedded in a prompt.
///
/// Drops anything outside word characters, whitespace and a small punctuation
/// set, then collapses whitespace runs to one space and trims. Running it on
/// its own output is a no-op.
pub fn preprocess(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if !is_allowed(ch) {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

fn is_allowed(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '/' || ALLOWED_PUNCTUATION.contains(&ch)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            words: word_count(text),
            characters: text.chars().count(),
        }
    }
}

/// Percentage of words removed, rounded to one decimal.
pub fn compression_ratio(input_words: usize, summary_words: usize) -> f64 {
    if input_words == 0 {
        return 0.0;
    }
    let ratio = (1.0 - summary_words as f64 / input_words as f64) * 100.0;
    (ratio * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{TextStats, compression_ratio, preprocess, word_count};

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(preprocess("  hello \n\n\tworld  "), "hello world");
    }

    #[test]
    fn strips_disallowed_characters() {
        assert_eq!(
            preprocess("cost: $5 & <b>tax</b> @home #1 (approx.)"),
            "cost: 5 btax/b home 1 (approx.)"
        );
        assert_eq!(preprocess("under_score \"quoted\" 'single' a/b"), "under_score \"quoted\" 'single' a/b");
    }

    #[test]
    fn removed_symbols_do_not_leave_double_spaces() {
        assert_eq!(preprocess("a @ b"), "a b");
        assert_eq!(preprocess("@@ a"), "a");
        assert_eq!(preprocess("a @@"), "a");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(preprocess("Le café est très bon — vraiment"), "Le café est très bon vraiment");
        assert_eq!(preprocess("東京 は 大きい"), "東京 は 大きい");
    }

    #[test]
    fn preprocessing_is_idempotent() {
        let samples = [
            "",
            "   ",
            "plain text",
            "  tabs\tand\nnewlines\r\n everywhere ",
            "symbols @ # $ % ^ & * = + ~ ` | \\ < > mixed in",
            "emoji 🎉 party 🎉🎉 time",
            "punctuation, kept! right? yes; no: maybe - (x) [y] {z} \"q\" 'r' s/t",
        ];
        for sample in samples {
            let once = preprocess(sample);
            assert_eq!(preprocess(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn stats_count_words_and_chars() {
        let stats = TextStats::from_text("héllo  wörld\n");
        assert_eq!(stats.words, 2);
        assert_eq!(stats.characters, 13);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn compression_ratio_rounds_to_one_decimal() {
        assert_eq!(compression_ratio(300, 100), 66.7);
        assert_eq!(compression_ratio(100, 100), 0.0);
        assert_eq!(compression_ratio(0, 10), 0.0);
        assert_eq!(compression_ratio(10, 20), -100.0);
    }
}
