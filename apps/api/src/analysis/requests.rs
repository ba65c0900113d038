//! Request builders, one pure function per oracle operation.
//!
//! Each builder returns a `Prompt` bundle; none of them perform I/O. Resumes
//! are embedded as pretty-printed JSON so the oracle sees the same structure
//! it produced when parsing.

use bytes::Bytes;

use crate::analysis::prompts::{
    CANDIDATE_A_HEADING, CANDIDATE_B_HEADING, CANDIDATE_RESUME_HEADING, FEEDBACK_CLOSING,
    FEEDBACK_INSTRUCTIONS, JD_COMPARISON_CLOSING, JD_COMPARISON_INSTRUCTIONS,
    JOB_DESCRIPTION_HEADING, OWN_RESUME_HEADING, PARSE_INSTRUCTIONS, PEER_COMPARISON_CLOSING,
    PEER_COMPARISON_INSTRUCTIONS, QUESTIONS_CLOSING, QUESTIONS_INSTRUCTIONS_TEMPLATE,
    QUESTIONS_PER_CATEGORY,
};
use crate::models::resume::ParsedResume;
use crate::oracle::prompts::{JSON_ONLY_CLOSING, RESUME_GROUNDING};
use crate::oracle::Prompt;

fn resume_json(resume: &ParsedResume) -> String {
    // Serializing plain strings and vectors cannot fail.
    serde_json::to_string_pretty(resume).unwrap_or_default()
}

fn closing(specific: &str) -> String {
    format!("{specific}\n{JSON_ONLY_CLOSING}")
}

pub fn build_parse_request(file_bytes: Bytes, mime_type: &str) -> Prompt {
    Prompt::new(PARSE_INSTRUCTIONS)
        .closing(JSON_ONLY_CLOSING)
        .attach(mime_type, file_bytes)
}

pub fn build_jd_comparison_request(resume: &ParsedResume, job_description: &str) -> Prompt {
    Prompt::new(format!("{JD_COMPARISON_INSTRUCTIONS}\n{RESUME_GROUNDING}"))
        .section(JOB_DESCRIPTION_HEADING, job_description)
        .section(CANDIDATE_RESUME_HEADING, resume_json(resume))
        .closing(closing(JD_COMPARISON_CLOSING))
}

pub fn build_peer_comparison_request(resume_a: &ParsedResume, resume_b: &ParsedResume) -> Prompt {
    Prompt::new(format!("{PEER_COMPARISON_INSTRUCTIONS}\n{RESUME_GROUNDING}"))
        .section(CANDIDATE_A_HEADING, resume_json(resume_a))
        .section(CANDIDATE_B_HEADING, resume_json(resume_b))
        .closing(closing(PEER_COMPARISON_CLOSING))
}

pub fn build_feedback_request(resume: &ParsedResume, job_description: &str) -> Prompt {
    Prompt::new(FEEDBACK_INSTRUCTIONS)
        .section(JOB_DESCRIPTION_HEADING, job_description)
        .section(OWN_RESUME_HEADING, resume_json(resume))
        .closing(closing(FEEDBACK_CLOSING))
}

pub fn build_interview_questions_request(resume: &ParsedResume, job_description: &str) -> Prompt {
    let instructions = QUESTIONS_INSTRUCTIONS_TEMPLATE
        .replace("{count}", &QUESTIONS_PER_CATEGORY.to_string());
    Prompt::new(format!("{instructions}\n{RESUME_GROUNDING}"))
        .section(JOB_DESCRIPTION_HEADING, job_description)
        .section(CANDIDATE_RESUME_HEADING, resume_json(resume))
        .closing(closing(QUESTIONS_CLOSING))
}
