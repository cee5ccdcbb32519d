/// Phrasings of "unable" accepted next to "sorry". Both apostrophe styles of
/// "I'm" are listed since agents emit either.
const UNABLE_VARIANTS: [&str; 4] = ["unable", "i am unable", "i'm unable", "i\u{2019}m unable"];

/// Suffix appended to a detected refusal before it is shown to the user.
pub const CLARIFY_SUFFIX: &str = "Please clarify your request.";

/// Detect an agent refusal.
///
/// Flags text that mentions "sorry" together with an "unable" phrasing,
/// case-insensitively, and returns the first line mentioning "sorry". Falls
/// back to the whole trimmed text if no single line carries it.
pub fn detect_refusal(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if !lower.contains("sorry") || !UNABLE_VARIANTS.iter().any(|v| lower.contains(v)) {
        return None;
    }

    let line = text
        .lines()
        .find(|line| line.to_lowercase().contains("sorry"))
        .map(str::trim)
        .unwrap_or_else(|| text.trim());
    Some(line.to_string())
}

/// Reply sent to the user in place of a refused structured answer.
pub fn clarification_reply(refusal: &str) -> String {
    format!("{refusal} {CLARIFY_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_plain_refusal() {
        let text = "I'm sorry, I am unable to help with that.";
        assert_eq!(detect_refusal(text), Some(text.to_string()));
    }

    #[test]
    fn returns_first_line_mentioning_sorry() {
        let text = "Thanks for the question.\n  Sorry, I'm unable to estimate this.  \nSorry again.";
        assert_eq!(
            detect_refusal(text),
            Some("Sorry, I'm unable to estimate this.".to_string())
        );
    }

    #[test]
    fn accepts_typographic_apostrophe() {
        let text = "SORRY \u{2014} I\u{2019}m unable to comply.";
        assert!(detect_refusal(text).is_some());
    }

    #[test]
    fn sorry_alone_is_not_a_refusal() {
        assert_eq!(detect_refusal("Sorry for the delay, here is the plan."), None);
        assert_eq!(detect_refusal("I am unable to find a cheaper vendor."), None);
    }

    #[test]
    fn regular_answers_are_not_refusals() {
        assert_eq!(detect_refusal("Here is your analysis: ..."), None);
        assert_eq!(detect_refusal(""), None);
    }

    #[test]
    fn clarification_reply_appends_suffix() {
        assert_eq!(
            clarification_reply("Sorry, I am unable to help."),
            "Sorry, I am unable to help. Please clarify your request."
        );
    }
}
