//! Oracle output records for comparison, feedback, and interview questions.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::schema::{array_of, integer, object, string, OutputSchema};

/// Reads a match score and clamps it into 0–100. Fractional scores are rounded.
fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(de::Error::custom("match_score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

fn score_schema() -> Value {
    integer("Percentage from 0-100 of the match")
}

fn strings(description: &str) -> Value {
    array_of(string("An entry"), description)
}

/// Recruiter view: one resume measured against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub name: String,
    #[serde(deserialize_with = "clamped_score")]
    pub match_score: u8,
    pub summary: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
}

impl OutputSchema for ComparisonResult {
    const NAME: &'static str = "ComparisonResult";

    fn response_schema() -> Value {
        object(
            &[
                ("name", string("Candidate's full name")),
                ("match_score", score_schema()),
                ("summary", string("One-paragraph summary of candidate's fit")),
                ("strengths", strings("Key skills/experiences that match")),
                ("gaps", strings("Key requirements missing from resume")),
            ],
            &["name", "match_score", "summary", "strengths", "gaps"],
        )
    }
}

/// Recruiter view: two resumes side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeComparison {
    pub skill_overlap: Vec<String>,
    pub candidate_a_strengths: Vec<String>,
    pub candidate_b_strengths: Vec<String>,
    pub recommendation: String,
}

impl OutputSchema for ResumeComparison {
    const NAME: &'static str = "ResumeComparison";

    fn response_schema() -> Value {
        object(
            &[
                ("skill_overlap", strings("Skills both candidates possess")),
                (
                    "candidate_a_strengths",
                    strings("Unique strengths of Candidate A"),
                ),
                (
                    "candidate_b_strengths",
                    strings("Unique strengths of Candidate B"),
                ),
                (
                    "recommendation",
                    string("Brief recommendation on who is stronger"),
                ),
            ],
            &[
                "skill_overlap",
                "candidate_a_strengths",
                "candidate_b_strengths",
                "recommendation",
            ],
        )
    }
}

/// Candidate view: coaching feedback against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeFeedback {
    #[serde(deserialize_with = "clamped_score")]
    pub match_score: u8,
    pub keyword_opportunities: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

impl OutputSchema for ResumeFeedback {
    const NAME: &'static str = "ResumeFeedback";

    fn response_schema() -> Value {
        object(
            &[
                ("match_score", score_schema()),
                (
                    "keyword_opportunities",
                    strings("Keywords from the JD missing in the resume"),
                ),
                (
                    "improvement_suggestions",
                    strings("Actionable suggestions for how to rephrase resume sections"),
                ),
            ],
            &[
                "match_score",
                "keyword_opportunities",
                "improvement_suggestions",
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestions {
    pub behavioral: Vec<InterviewQuestion>,
    pub technical: Vec<InterviewQuestion>,
    pub resume_specific: Vec<InterviewQuestion>,
}

impl GeneratedQuestions {
    /// Categories in display order with their headings.
    pub fn sections(&self) -> [(&'static str, &[InterviewQuestion]); 3] {
        [
            ("Behavioral Questions", self.behavioral.as_slice()),
            ("Technical Questions", self.technical.as_slice()),
            ("Resume-Specific Questions", self.resume_specific.as_slice()),
        ]
    }
}

impl OutputSchema for GeneratedQuestions {
    const NAME: &'static str = "GeneratedQuestions";

    fn response_schema() -> Value {
        let question = object(
            &[
                ("question", string("The specific question")),
                ("reasoning", string("Why this question is being asked")),
            ],
            &["question", "reasoning"],
        );
        object(
            &[
                ("behavioral", array_of(question.clone(), "Behavioral questions")),
                ("technical", array_of(question.clone(), "Technical questions")),
                (
                    "resume_specific",
                    array_of(question, "Questions about the candidate's own history"),
                ),
            ],
            &["behavioral", "technical", "resume_specific"],
        )
    }
}
