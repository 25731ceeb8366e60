//! Sentence and paragraph grouping for the docx export.

use super::normalize_whitespace;

/// Sentences grouped into one paragraph.
pub const SENTENCES_PER_PARAGRAPH: usize = 3;

/// Split after `.`, `!` or `?` when followed by at least one space.
///
/// The terminator stays with its sentence; the separating spaces are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek() == Some(&' ') {
            while chars.peek() == Some(&' ') {
                chars.next();
            }
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Group sentences three at a time; a shorter trailing group is kept.
pub fn split_into_paragraphs(text: &str) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    split_sentences(&normalized)
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|group| group.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two!  Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
    }

    #[test]
    fn test_terminator_without_space_does_not_split() {
        assert_eq!(split_sentences("Rs.10,000 only. Done."), vec!["Rs.10,000 only.", "Done."]);
    }

    #[test]
    fn test_paragraphs_of_three() {
        let text = "A one. B two. C three. D four. E five.";
        assert_eq!(
            split_into_paragraphs(text),
            vec!["A one. B two. C three.", "D four. E five."]
        );
    }

    #[test]
    fn test_paragraphs_normalize_whitespace() {
        let text = "First line.\n\nSecond   line.\tThird.";
        assert_eq!(split_into_paragraphs(text), vec!["First line. Second line. Third."]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_into_paragraphs("   ").is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_cleaned_text_splits_on_detached_periods() {
        let cleaned = crate::text::clean_text("We undertake. It is valid.");
        assert_eq!(split_sentences(&cleaned), vec!["We undertake .", "It is valid ."]);
    }
}
