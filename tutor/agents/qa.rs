use crate::retriever::RankedCandidate;

/// Longest answer produced unless configured otherwise.
pub const DEFAULT_ANSWER_MAX_CHARS: usize = 800;

/// Reply used when retrieval found nothing.
pub const NO_MATERIAL_ANSWER: &str =
    "I couldn't find relevant material. Can you rephrase or add detail?";

/// Builds a short answer from ranked contexts.
pub trait AnswerSynthesizer: Send + Sync {
    /// Agent identifier used in logs.
    fn name(&self) -> &str;
    /// Answer for `question`, drawing on `contexts` best first.
    fn answer(&self, question: &str, contexts: &[RankedCandidate]) -> String;
}

/// Offline answerer that points the student at the top resource.
#[derive(Debug, Clone)]
pub struct TemplateAnswerer {
    max_chars: usize,
}

impl TemplateAnswerer {
    /// Creates an answerer truncating to `max_chars` characters.
    #[must_use]
    pub const fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Truncation limit in characters.
    #[must_use]
    pub const fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl Default for TemplateAnswerer {
    fn default() -> Self {
        Self::new(DEFAULT_ANSWER_MAX_CHARS)
    }
}

impl AnswerSynthesizer for TemplateAnswerer {
    fn name(&self) -> &str {
        "template_answerer"
    }

    fn answer(&self, question: &str, contexts: &[RankedCandidate]) -> String {
        let Some(top) = contexts.first() else {
            return NO_MATERIAL_ANSWER.to_string();
        };
        let title = &top.document.title;
        let answer = format!(
            "Short answer (based on {title}): This covers the concept related to '{question}'. \
             See top resource '{title}' for details."
        );
        truncate_chars(answer, self.max_chars)
    }
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}
