// Rule-based sentence segmentation
use once_cell::sync::Lazy;
use regex::Regex;

// A terminal mark followed by whitespace; the split falls right after the mark
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("static regex"));

pub trait SentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Splits after `.`, `!` or `?` when whitespace follows.
///
/// Abbreviations ("esim. "), ordinals ("3. ") and quoted endings are split or
/// kept exactly as the rule says; there is no language model behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PunctuationSegmenter;

impl SentenceSegmenter for PunctuationSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        split_sentences(text)
    }
}

pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Terminal marks are ASCII, so +1 stays on a char boundary
        push_trimmed(&mut sentences, &text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_two_sentences() {
        assert_eq!(
            split_sentences("Kissa istuu matolla. Se nukkuu."),
            vec!["Kissa istuu matolla.", "Se nukkuu."]
        );
    }

    #[rstest]
    #[case("", 0)]
    #[case("   \n\n\t ", 0)]
    #[case("Ei välimerkkejä lainkaan", 1)]
    #[case("Hei! Mitä kuuluu? Hyvää.", 3)]
    #[case("Sivu yksi.\n\nSivu kaksi.", 2)]
    #[case("Hinta on 3.50 euroa.", 1)]
    #[case("Katso esim. liite. Kiitos.", 3)]
    #[case("Odota...   Nyt!", 2)]
    #[case("Loppu.", 1)]
    fn test_sentence_counts(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(split_sentences(text).len(), expected);
    }

    #[test]
    fn test_no_boundary_without_whitespace() {
        assert_eq!(split_sentences("a.b!c?d"), vec!["a.b!c?d"]);
    }

    #[test]
    fn test_quoted_terminal_stays_with_quote() {
        // The mark is followed by a quote, not whitespace
        assert_eq!(
            split_sentences("Hän sanoi \"Moi.\" Sitten lähti."),
            vec!["Hän sanoi \"Moi.\" Sitten lähti."]
        );
    }

    #[test]
    fn test_whole_input_when_no_split() {
        assert_eq!(split_sentences("  yksi lause  "), vec!["yksi lause"]);
    }

    #[test]
    fn test_order_and_no_empty_sentences() {
        let text = "Ensin.  Toiseksi!\n\n\nKolmanneksi?   Lopuksi.";
        let sentences = PunctuationSegmenter.segment(text);
        assert_eq!(sentences, vec!["Ensin.", "Toiseksi!", "Kolmanneksi?", "Lopuksi."]);
        assert!(sentences.iter().all(|s| !s.is_empty() && s.trim() == s));
    }

    #[test]
    fn test_unicode_whitespace_boundary() {
        assert_eq!(split_sentences("Yö.\u{00a0}Päivä."), vec!["Yö.", "Päivä."]);
    }
}
