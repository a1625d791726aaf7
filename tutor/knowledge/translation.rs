const KANNADA: std::ops::RangeInclusive<char> = '\u{0C80}'..='\u{0CFF}';
const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Guesses the language of `text` from its script: `kn`, `hi`, or `en` as the fallback.
///
/// Kannada wins over Devanagari when both scripts appear.
#[must_use]
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(|ch| KANNADA.contains(&ch)) {
        return "kn";
    }
    if text.chars().any(|ch| DEVANAGARI.contains(&ch)) {
        return "hi";
    }
    "en"
}

/// Translation provider seam.
pub trait Translator: Send + Sync {
    /// Translates `text` into `target_lang`.
    fn translate(&self, text: &str, target_lang: &str) -> String;
}

/// Offline translator: returns text already in the target language untouched and
/// marks everything else with a `[translated src->dst]` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> String {
        let source = detect_language(text);
        if source == target_lang {
            return text.to_string();
        }
        format!("[translated {source}->{target_lang}] {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_scripts() {
        assert_eq!(detect_language("ಕನ್ನಡ ಅಕ್ಷರಗಳು"), "kn");
        assert_eq!(detect_language("भिन्न संख्या"), "hi");
        assert_eq!(detect_language("fractions"), "en");
        assert_eq!(detect_language(""), "en");
    }

    #[test]
    fn passthrough_only_marks_foreign_text() {
        let translator = PassthroughTranslator;
        assert_eq!(translator.translate("fractions", "en"), "fractions");
        assert_eq!(
            translator.translate("fractions", "kn"),
            "[translated en->kn] fractions"
        );
    }
}
