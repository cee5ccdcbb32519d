use std::sync::LazyLock;

use regex::Regex;

/// Greeting-only utterances (English and Russian), optionally followed by punctuation.
static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:hi|hello|hey|good\s+(?:morning|afternoon|evening)|привет|здравствуй(?:те)?|добрый\s+(?:день|вечер)|доброе\s+утро)[\s!.,]*$",
    )
    .expect("valid greeting regex")
});

/// Estimation and analysis keywords, matched as whole words.
static ANALYSIS_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:",
        r"посчита(?:й|ть|йте)|рассчита(?:й|ть|йте)|расч[её]т\w*|",
        r"оценк\w*|оценить|оцени(?:те)?|анализ\w*|проанализируй(?:те)?|",
        r"смет\w*|бюджет\w*|срок\w*|стоимост\w*|",
        r"estimat\w*|costs?|pric(?:e|es|ing)|budget\w*|",
        r"analy[sz]\w*|timelines?|scope|evaluat\w*",
        r")\b",
    ))
    .expect("valid analysis keyword regex")
});

/// Whether the text is nothing but a greeting.
pub fn is_greeting(text: &str) -> bool {
    GREETING_RE.is_match(text)
}

/// Decide whether a short user utterance asks for structured analysis.
///
/// Greetings never trigger analysis, even if a keyword slips in.
pub fn is_analysis_intent(text: &str) -> bool {
    if text.trim().is_empty() || is_greeting(text) {
        return false;
    }
    ANALYSIS_KEYWORD_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_casual() {
        for text in ["Hello", "hi!", "  Hey ,.", "Привет", "добрый   вечер!", "Good morning"] {
            assert!(is_greeting(text), "{text:?} should be a greeting");
            assert!(!is_analysis_intent(text), "{text:?} should be casual");
        }
    }

    #[test]
    fn estimation_questions_trigger_analysis() {
        for text in [
            "What is the estimated cost?",
            "Can you estimate the budget for a landing page?",
            "timeline for an MVP",
            "Please analyze my project",
            "Сколько будет стоимость разработки?",
            "Посчитай смету для магазина",
        ] {
            assert!(is_analysis_intent(text), "{text:?} should trigger analysis");
        }
    }

    #[test]
    fn keywords_inside_other_words_do_not_match() {
        assert!(!is_analysis_intent("I love my costume"));
        assert!(!is_analysis_intent("the telescope is new"));
        assert!(!is_analysis_intent("Tell me a joke"));
    }

    #[test]
    fn greeting_followed_by_question_is_not_greeting_only() {
        assert!(!is_greeting("hi, what would it cost?"));
        assert!(is_analysis_intent("hi, what would it cost?"));
    }

    #[test]
    fn empty_input_is_casual() {
        assert!(!is_analysis_intent(""));
        assert!(!is_analysis_intent("   "));
    }
}
