use crate::{
    records::{PracticeItem, TeachingPacket},
    retriever::RankedCandidate,
};

/// Expands a short answer into a teaching packet.
pub trait TeachingExpander: Send + Sync {
    /// Agent identifier used in logs.
    fn name(&self) -> &str;
    /// Explanation, two examples, and two practice items for `question`.
    fn teach(
        &self,
        question: &str,
        answer: &str,
        contexts: &[RankedCandidate],
        student_level: Option<u8>,
    ) -> TeachingPacket;
}

/// Offline expander producing fixed easy and medium framings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateTutor;

impl TeachingExpander for TemplateTutor {
    fn name(&self) -> &str {
        "template_tutor"
    }

    // TODO: adapt explanation depth and practice difficulty to `student_level`
    // once graded templates exist; the level is accepted but unused for now.
    fn teach(
        &self,
        question: &str,
        answer: &str,
        _contexts: &[RankedCandidate],
        _student_level: Option<u8>,
    ) -> TeachingPacket {
        TeachingPacket {
            explanation: format!(
                "Step-by-step: To approach '{question}', first recall the basics from the \
                 resource. {answer}"
            ),
            examples: vec![
                format!("Example 1: A simple variant of {question}. Solution outline: ..."),
                format!("Example 2: Another practice on {question}. Solution outline: ..."),
            ],
            practice: vec![
                PracticeItem {
                    question: format!("Solve a basic problem related to {question} (easy)."),
                    expected_answer: "Answer: use basic rules.".to_string(),
                },
                PracticeItem {
                    question: format!("Solve a slightly harder {question} (medium)."),
                    expected_answer: "Answer: combine steps.".to_string(),
                },
            ],
        }
    }
}
