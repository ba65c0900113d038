// Shared prompt fragments.
// Operation-specific prompt text lives in analysis/prompts.rs.

/// Appended to every structured prompt. The schema is enforced by the
/// generation config as well; this keeps free text out of the response.
pub const JSON_ONLY_CLOSING: &str = "\
    Return the data in the required JSON format only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Instruction used wherever a serialized resume is embedded.
pub const RESUME_GROUNDING: &str = "\
    Base every statement on the resume data provided. \
    Do NOT invent employers, dates, skills, or credentials that are not present.";
