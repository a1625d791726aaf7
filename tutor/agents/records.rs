use serde::{Deserialize, Serialize};

use crate::{feedback::Assessment, retriever::RankedCandidate};

/// A practice question with its model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeItem {
    /// Question posed to the student.
    pub question: String,
    /// Answer the student should reach.
    pub expected_answer: String,
}

/// Explanation, worked examples, and practice produced for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingPacket {
    /// Step-by-step explanation embedding the short answer.
    pub explanation: String,
    /// Illustrative examples, in presentation order.
    pub examples: Vec<String>,
    /// Practice items, easiest first.
    pub practice: Vec<PracticeItem>,
}

/// Id and score of a retrieved document, as kept in session memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedRef {
    /// Document id.
    pub id: String,
    /// Retrieval score.
    pub score: f64,
}

impl From<&RankedCandidate> for RetrievedRef {
    fn from(candidate: &RankedCandidate) -> Self {
        Self {
            id: candidate.id.clone(),
            score: candidate.score,
        }
    }
}

/// One entry of a session's short-term memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionRecord {
    /// A question answered by the pipeline.
    Interaction {
        /// Question as asked.
        question: String,
        /// Synthesized short answer.
        answer: String,
        /// Teaching packet derived from the answer.
        teaching: TeachingPacket,
        /// Contexts used, best first.
        retrieved: Vec<RetrievedRef>,
    },
    /// A graded student answer.
    Assessment {
        /// Grading outcome.
        assessment: Assessment,
        /// What the student wrote.
        student_answer: String,
        /// Reference answer.
        expected: String,
    },
}

impl SessionRecord {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Interaction { .. } => "interaction",
            Self::Assessment { .. } => "assessment",
        }
    }
}

/// Full response to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResponse {
    /// Question as asked.
    pub question: String,
    /// Synthesized short answer.
    pub answer: String,
    /// Teaching packet.
    pub teaching: TeachingPacket,
    /// Contexts used, best first.
    pub retrieved: Vec<RankedCandidate>,
    /// The session's records after this interaction, oldest first.
    pub session_memory: Vec<SessionRecord>,
}
