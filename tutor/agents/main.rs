use std::{fmt, sync::Arc};

use serde_json::json;
use shared_logging::LogLevel;
use tutor_knowledge::Corpus;
use tutor_memory_data::SessionStore;
use tutor_planning::StudentProfile;

use crate::{
    config::TutorConfig,
    feedback::{Assessment, Grader, SimilarityGrader},
    qa::{AnswerSynthesizer, TemplateAnswerer},
    records::{QuestionResponse, RetrievedRef, SessionRecord},
    retriever::{LexicalRetriever, Retriever},
    telemetry::AgentTelemetry,
    tutor::{TeachingExpander, TemplateTutor},
};

/// Routes questions through retrieval, answering, and teaching, and grades
/// student answers, keeping a bounded memory per session.
pub struct Orchestrator {
    retriever: Arc<dyn Retriever>,
    answerer: Arc<dyn AnswerSynthesizer>,
    tutor: Arc<dyn TeachingExpander>,
    grader: Arc<dyn Grader>,
    sessions: SessionStore<SessionRecord>,
    config: TutorConfig,
    telemetry: Option<AgentTelemetry>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("retriever", &self.retriever.name())
            .field("answerer", &self.answerer.name())
            .field("tutor", &self.tutor.name())
            .field("grader", &self.grader.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Wires the offline agents over `corpus` using `config`.
    #[must_use]
    pub fn new(corpus: Arc<Corpus>, config: TutorConfig) -> Self {
        Self {
            retriever: Arc::new(LexicalRetriever::new(corpus)),
            answerer: Arc::new(TemplateAnswerer::new(config.answer_max_chars)),
            tutor: Arc::new(TemplateTutor),
            grader: Arc::new(SimilarityGrader::new(config.grading_threshold)),
            sessions: SessionStore::new(config.memory_size),
            config,
            telemetry: None,
        }
    }

    /// Replaces the retriever.
    #[must_use]
    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = retriever;
        self
    }

    /// Replaces the answer synthesizer.
    #[must_use]
    pub fn with_answerer(mut self, answerer: Arc<dyn AnswerSynthesizer>) -> Self {
        self.answerer = answerer;
        self
    }

    /// Replaces the teaching expander.
    #[must_use]
    pub fn with_tutor(mut self, tutor: Arc<dyn TeachingExpander>) -> Self {
        self.tutor = tutor;
        self
    }

    /// Replaces the grader.
    #[must_use]
    pub fn with_grader(mut self, grader: Arc<dyn Grader>) -> Self {
        self.grader = grader;
        self
    }

    /// Injects telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: AgentTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Answers `question` for `session_id` and records the interaction.
    ///
    /// The profile's grade is forwarded to the teaching expander. An empty
    /// ranking still yields a fallback answer and a full teaching packet.
    pub fn handle_question(
        &self,
        session_id: &str,
        question: &str,
        profile: Option<&StudentProfile>,
    ) -> QuestionResponse {
        let mut ranked = self.timed("retriever.rank", || {
            self.retriever.rank(question, self.config.retrieval_top_k)
        });
        self.log(
            LogLevel::Info,
            "agents.retriever.ranked",
            json!({
                "session_id": session_id,
                "retriever": self.retriever.name(),
                "candidates": ranked.len(),
                "top_score": ranked.first().map(|candidate| candidate.score),
            }),
        );
        ranked.truncate(self.config.context_k);
        let contexts = ranked;

        let answer = self.timed("answerer.answer", || self.answerer.answer(question, &contexts));
        let level = profile.map(|student| student.grade);
        let teaching = self.timed("tutor.teach", || {
            self.tutor.teach(question, &answer, &contexts, level)
        });

        self.record(
            session_id,
            SessionRecord::Interaction {
                question: question.to_string(),
                answer: answer.clone(),
                teaching: teaching.clone(),
                retrieved: contexts.iter().map(RetrievedRef::from).collect(),
            },
        );
        self.event(
            "agents.question.answered",
            json!({
                "session_id": session_id,
                "question": question,
                "retrieved": contexts.iter().map(|candidate| &candidate.id).collect::<Vec<_>>(),
            }),
        );

        QuestionResponse {
            question: question.to_string(),
            answer,
            teaching,
            retrieved: contexts,
            session_memory: self.sessions.get(session_id),
        }
    }

    /// Grades a student answer and records the assessment.
    pub fn assess_answer(
        &self,
        session_id: &str,
        student_answer: &str,
        expected_answer: &str,
    ) -> Assessment {
        let assessment = self.timed("grader.assess", || {
            self.grader.assess(student_answer, expected_answer)
        });
        self.record(
            session_id,
            SessionRecord::Assessment {
                assessment: assessment.clone(),
                student_answer: student_answer.to_string(),
                expected: expected_answer.to_string(),
            },
        );
        self.event(
            "agents.assessment.recorded",
            json!({
                "session_id": session_id,
                "score": assessment.score,
                "correct": assessment.correct,
            }),
        );
        assessment
    }

    /// Records of a session, oldest first. Unknown sessions are empty.
    #[must_use]
    pub fn session_memory(&self, session_id: &str) -> Vec<SessionRecord> {
        self.sessions.get(session_id)
    }

    /// Forgets a session. Returns whether it existed.
    pub fn clear_session(&self, session_id: &str) -> bool {
        let existed = self.sessions.clear(session_id);
        self.log(
            LogLevel::Info,
            "agents.session.cleared",
            json!({ "session_id": session_id, "existed": existed }),
        );
        existed
    }

    fn record(&self, session_id: &str, record: SessionRecord) {
        let kind = record.kind();
        let evicted = self.sessions.append(session_id, record);
        self.log(
            LogLevel::Debug,
            "agents.session.appended",
            json!({ "session_id": session_id, "kind": kind, "evicted": evicted }),
        );
    }

    fn timed<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        match &self.telemetry {
            Some(tel) => tel.timed(operation, f),
            None => f(),
        }
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }

    fn event(&self, event_type: &str, payload: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.event(event_type, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{qa::NO_MATERIAL_ANSWER, retriever::RankedCandidate};
    use shared_event_bus::MemoryEventBus;
    use shared_logging::read_records;
    use tempfile::tempdir;
    use tutor_knowledge::Document;

    fn fractions_corpus() -> Arc<Corpus> {
        Arc::new(
            Corpus::from_documents([Document::new(
                "r1",
                "Fractions Intro",
                "math",
                "Fractions represent parts of a whole number and are written as a/b.",
            )])
            .unwrap(),
        )
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(fractions_corpus(), TutorConfig::default())
    }

    #[test]
    fn answers_fractions_question_end_to_end() {
        let response = orchestrator().handle_question("s1", "fractions", None);
        assert!(response.answer.contains("Fractions Intro"));
        assert_eq!(response.teaching.practice.len(), 2);
        assert_eq!(response.teaching.examples.len(), 2);
        assert_eq!(response.retrieved.len(), 1);
        assert_eq!(response.retrieved[0].id, "r1");
        assert!(response.retrieved[0].score > 0.0);
        assert_eq!(response.session_memory.len(), 1);
        match &response.session_memory[0] {
            SessionRecord::Interaction { retrieved, .. } => {
                assert_eq!(retrieved[0].id, "r1");
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn grading_scenario_is_correct() {
        let orchestrator = orchestrator();
        let result = orchestrator.assess_answer(
            "s1",
            "Fractions are parts of a whole.",
            "Fractions represent parts of a whole number.",
        );
        assert!(result.score >= 0.6);
        assert!(result.correct);
        assert!(matches!(
            orchestrator.session_memory("s1")[0],
            SessionRecord::Assessment { .. }
        ));
    }

    #[test]
    fn unmatched_question_gets_fallback_answer() {
        let orchestrator = orchestrator();
        let response = orchestrator.handle_question("s1", "xyz", None);
        assert!(response.retrieved.is_empty());
        assert_eq!(response.answer, NO_MATERIAL_ANSWER);
        assert_eq!(response.teaching.practice.len(), 2);
    }

    #[test]
    fn memory_keeps_last_records_in_order() {
        let config = TutorConfig {
            memory_size: 3,
            ..TutorConfig::default()
        };
        let orchestrator = Orchestrator::new(fractions_corpus(), config);
        for idx in 0..5 {
            orchestrator.assess_answer("s1", &format!("answer {idx}"), "answer");
        }
        let memory = orchestrator.session_memory("s1");
        assert_eq!(memory.len(), 3);
        let answers: Vec<_> = memory
            .iter()
            .map(|record| match record {
                SessionRecord::Assessment { student_answer, .. } => student_answer.as_str(),
                SessionRecord::Interaction { .. } => "",
            })
            .collect();
        assert_eq!(answers, ["answer 2", "answer 3", "answer 4"]);
    }

    #[test]
    fn sessions_are_isolated_and_clearable() {
        let orchestrator = orchestrator();
        orchestrator.handle_question("a", "fractions", None);
        assert!(orchestrator.session_memory("b").is_empty());
        assert!(orchestrator.clear_session("a"));
        assert!(orchestrator.session_memory("a").is_empty());
        assert!(!orchestrator.clear_session("a"));
    }

    struct FixedRetriever;

    impl Retriever for FixedRetriever {
        fn name(&self) -> &str {
            "fixed"
        }

        fn rank(&self, _query: &str, top_k: usize) -> Vec<RankedCandidate> {
            (0..top_k)
                .map(|idx| RankedCandidate {
                    id: format!("d{idx}"),
                    score: 10.0 - f64::from(u8::try_from(idx).unwrap()),
                    document: Document::new(format!("d{idx}"), format!("Doc {idx}"), "", ""),
                })
                .collect()
        }
    }

    #[test]
    fn only_leading_contexts_reach_the_answerer() {
        let orchestrator = orchestrator().with_retriever(Arc::new(FixedRetriever));
        let response = orchestrator.handle_question("s1", "anything", None);
        let ids: Vec<_> = response.retrieved.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["d0", "d1", "d2"]);
        assert!(response.answer.contains("Doc 0"));
    }

    #[test]
    fn telemetry_records_pipeline() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("agents.log");
        let bus = Arc::new(MemoryEventBus::new(16));
        let telemetry = AgentTelemetry::builder("tutor-agents")
            .log_path(&log_path)
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        let orchestrator = orchestrator().with_telemetry(telemetry);
        let profile = StudentProfile::new("s", "Asha", 6, "kn", 500);
        orchestrator.handle_question("s1", "fractions", Some(&profile));
        orchestrator.assess_answer("s1", "a", "a");

        let messages: Vec<_> = read_records(&log_path)
            .unwrap()
            .into_iter()
            .map(|record| record.message)
            .collect();
        assert!(messages.iter().any(|m| m == "agents.retriever.ranked"));
        assert!(messages.iter().any(|m| m == "agents.session.appended"));
        assert!(messages.iter().any(|m| m == "agents.timing"));
        assert_eq!(bus.snapshot_by_type("agents.question.answered").len(), 1);
        let graded = bus.snapshot_by_type("agents.assessment.recorded");
        assert_eq!(graded[0].payload["correct"], true);
    }
}
