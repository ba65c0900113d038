//! Analyzer — the oracle-backed operations.
//!
//! Flow per operation: build prompt → structured client handle → oracle call →
//! validate → memoize. Callers receive a typed `AnalysisError`; HTTP handlers
//! turn it into an `Outcome` with a message instead of failing the request.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::analysis::memo::{Fingerprint, FingerprintBuilder, OperationCaches};
use crate::analysis::requests::{
    build_feedback_request, build_interview_questions_request, build_jd_comparison_request,
    build_parse_request, build_peer_comparison_request,
};
use crate::analysis::validator::{validate, ValidationError};
use crate::models::analysis::{
    ComparisonResult, GeneratedQuestions, ResumeComparison, ResumeFeedback,
};
use crate::models::resume::ParsedResume;
use crate::models::schema::OutputSchema;
use crate::models::upload::UploadedFile;
use crate::oracle::{create_structured_client, Oracle, OracleError, Prompt};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("oracle call failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("invalid oracle response ({0})")]
    Validation(#[from] ValidationError),
}

/// The result of one AI-backed operation as shown to a user: either a record,
/// or nothing plus a message explaining what went wrong.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub result: Option<T>,
    pub message: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            result: None,
            message: Some(message.into()),
        }
    }

    /// Converts an operation result, logging the failure. `activity` reads
    /// like "parsing resume 'cv.pdf'".
    pub fn from_result(result: Result<T, AnalysisError>, activity: &str) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => {
                error!("Error {activity}: {e}");
                Self::failed(format!("Error {activity}: {e}"))
            }
        }
    }
}

/// Runs oracle operations against one model, memoizing results.
#[derive(Clone)]
pub struct Analyzer {
    oracle: Arc<dyn Oracle>,
    model: String,
    caches: Arc<OperationCaches>,
}

impl Analyzer {
    pub fn new(oracle: Arc<dyn Oracle>, model: impl Into<String>) -> Self {
        Self {
            oracle,
            model: model.into(),
            caches: Arc::new(OperationCaches::default()),
        }
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        &self.oracle
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn caches(&self) -> &OperationCaches {
        &self.caches
    }

    async fn run<T: OutputSchema>(&self, prompt: Prompt) -> Result<T, AnalysisError> {
        let handle = create_structured_client::<T>(&self.model);
        let raw = self.oracle.generate(&handle, &prompt).await?;
        Ok(validate::<T>(&raw)?)
    }

    fn key(&self, operation: &str) -> FingerprintBuilder {
        Fingerprint::builder(operation).text(&self.model)
    }

    /// Sends the raw document to the oracle and extracts a `ParsedResume`.
    pub async fn parse_resume(&self, file: &UploadedFile) -> Result<ParsedResume, AnalysisError> {
        let cache = &self.caches.parse;
        let key = self
            .key(cache.operation())
            .text(file.mime_type())
            .bytes(&file.data)
            .finish();
        cache
            .memoize(key, || {
                self.run(build_parse_request(file.data.clone(), file.mime_type()))
            })
            .await
    }

    pub async fn compare_to_jd(
        &self,
        resume: &ParsedResume,
        job_description: &str,
    ) -> Result<ComparisonResult, AnalysisError> {
        let cache = &self.caches.compare_jd;
        let key = self
            .key(cache.operation())
            .record(resume)
            .text(job_description)
            .finish();
        cache
            .memoize(key, || {
                self.run(build_jd_comparison_request(resume, job_description))
            })
            .await
    }

    pub async fn compare_two_resumes(
        &self,
        resume_a: &ParsedResume,
        resume_b: &ParsedResume,
    ) -> Result<ResumeComparison, AnalysisError> {
        let cache = &self.caches.compare_peers;
        let key = self
            .key(cache.operation())
            .record(resume_a)
            .record(resume_b)
            .finish();
        cache
            .memoize(key, || {
                self.run(build_peer_comparison_request(resume_a, resume_b))
            })
            .await
    }

    pub async fn resume_feedback(
        &self,
        resume: &ParsedResume,
        job_description: &str,
    ) -> Result<ResumeFeedback, AnalysisError> {
        let cache = &self.caches.feedback;
        let key = self
            .key(cache.operation())
            .record(resume)
            .text(job_description)
            .finish();
        cache
            .memoize(key, || self.run(build_feedback_request(resume, job_description)))
            .await
    }

    pub async fn interview_questions(
        &self,
        resume: &ParsedResume,
        job_description: &str,
    ) -> Result<GeneratedQuestions, AnalysisError> {
        let cache = &self.caches.questions;
        let key = self
            .key(cache.operation())
            .record(resume)
            .text(job_description)
            .finish();
        cache
            .memoize(key, || {
                self.run(build_interview_questions_request(resume, job_description))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prompts::{CANDIDATE_A_HEADING, CANDIDATE_B_HEADING};
    use crate::analysis::validator::ValidationErrorKind;
    use crate::oracle::stub::StubOracle;
    use bytes::Bytes;

    const RESUME_JSON: &str = r#"{"name": "Ada", "email": null, "phone": null, "summary": null,
        "skills": ["Python", "SQL"], "education": [], "experience": []}"#;

    fn resume(name: &str, skills: &[&str]) -> ParsedResume {
        ParsedResume {
            name: Some(name.to_string()),
            email: None,
            phone: None,
            summary: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            education: vec![],
            experience: vec![],
        }
    }

    fn pdf(name: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile::new(name, Some("application/pdf"), Bytes::from_static(body)).unwrap()
    }

    fn analyzer(stub: &Arc<StubOracle>) -> Analyzer {
        Analyzer::new(stub.clone(), "models/gemini-2.5-flash")
    }

    #[tokio::test]
    async fn test_parse_resume_sends_document_and_validates() {
        let stub = Arc::new(StubOracle::fixed(RESUME_JSON));
        let parsed = analyzer(&stub)
            .parse_resume(&pdf("ada.pdf", b"%PDF ada"))
            .await
            .unwrap();

        assert_eq!(parsed.name.as_deref(), Some("Ada"));
        let prompts = stub.prompts();
        assert_eq!(prompts[0].0, "ParsedResume");
        let attachment = prompts[0].1.attachment.as_ref().unwrap();
        assert_eq!(attachment.data, Bytes::from_static(b"%PDF ada"));
    }

    #[tokio::test]
    async fn test_identical_parse_calls_hit_oracle_once() {
        let stub = Arc::new(StubOracle::fixed(RESUME_JSON));
        let analyzer = analyzer(&stub);
        let file = pdf("ada.pdf", b"%PDF ada");

        let first = analyzer.parse_resume(&file).await.unwrap();
        let second = analyzer.parse_resume(&file).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stub.calls(), 1);
        assert_eq!(analyzer.caches().stats().parse, 1);
    }

    #[tokio::test]
    async fn test_different_bytes_are_parsed_separately() {
        let stub = Arc::new(StubOracle::fixed(RESUME_JSON));
        let analyzer = analyzer(&stub);
        analyzer.parse_resume(&pdf("a.pdf", b"one")).await.unwrap();
        analyzer.parse_resume(&pdf("a.pdf", b"two")).await.unwrap();
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_jd_comparison_cached_per_job_description() {
        let stub = Arc::new(StubOracle::fixed(
            r#"{"name": "Ada", "match_score": 80, "summary": "s", "strengths": [], "gaps": []}"#,
        ));
        let analyzer = analyzer(&stub);
        let ada = resume("Ada", &["Python"]);

        analyzer.compare_to_jd(&ada, "JD one").await.unwrap();
        analyzer.compare_to_jd(&ada, "JD one").await.unwrap();
        analyzer.compare_to_jd(&ada, "JD two").await.unwrap();

        assert_eq!(stub.calls_for("ComparisonResult"), 2);
    }

    #[tokio::test]
    async fn test_peer_comparison_reports_shared_skill() {
        let stub = Arc::new(StubOracle::fixed(
            r#"{"skill_overlap": ["Python"], "candidate_a_strengths": ["SQL"],
                "candidate_b_strengths": ["Go"], "recommendation": "Both are strong."}"#,
        ));
        let a = resume("Ada", &["Python", "SQL"]);
        let b = resume("Grace", &["Python", "Go"]);

        let comparison = analyzer(&stub).compare_two_resumes(&a, &b).await.unwrap();

        assert!(comparison.skill_overlap.contains(&"Python".to_string()));
        let (schema, prompt) = &stub.prompts()[0];
        assert_eq!(schema, "ResumeComparison");
        let embedded_a: ParsedResume =
            serde_json::from_str(prompt.section_body(CANDIDATE_A_HEADING).unwrap()).unwrap();
        let embedded_b: ParsedResume =
            serde_json::from_str(prompt.section_body(CANDIDATE_B_HEADING).unwrap()).unwrap();
        assert_eq!(embedded_a, a);
        assert_eq!(embedded_b, b);
    }

    #[tokio::test]
    async fn test_malformed_response_is_typed_error() {
        let stub = Arc::new(StubOracle::fixed("I could not read that file, sorry."));
        let err = analyzer(&stub)
            .parse_resume(&pdf("cv.pdf", b"x"))
            .await
            .unwrap_err();
        match err {
            AnalysisError::Validation(v) => assert_eq!(v.kind, ValidationErrorKind::MalformedJson),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_oracle_failure_becomes_outcome_message() {
        let stub = Arc::new(StubOracle::failing());
        let result = analyzer(&stub)
            .resume_feedback(&resume("Ada", &[]), "JD")
            .await;
        let outcome = Outcome::from_result(result, "generating feedback");

        assert!(outcome.result.is_none());
        let message = outcome.message.unwrap();
        assert!(message.starts_with("Error generating feedback"));
        assert!(message.contains("503"));
    }

    #[tokio::test]
    async fn test_failed_call_is_retried_on_next_request() {
        let stub = Arc::new(StubOracle::failing());
        let analyzer = analyzer(&stub);
        let ada = resume("Ada", &[]);
        assert!(analyzer.interview_questions(&ada, "JD").await.is_err());
        assert!(analyzer.interview_questions(&ada, "JD").await.is_err());
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_questions_request_uses_questions_schema() {
        let stub = Arc::new(StubOracle::fixed(
            r#"{"behavioral": [{"question": "q", "reasoning": "r"}], "technical": [], "resume_specific": []}"#,
        ));
        let questions = analyzer(&stub)
            .interview_questions(&resume("Ada", &[]), "JD")
            .await
            .unwrap();
        assert_eq!(questions.behavioral.len(), 1);
        assert_eq!(stub.calls_for("GeneratedQuestions"), 1);
    }
}
