// All oracle prompt text for the analysis operations.
// Section headings double as lookup keys in tests; keep them stable.

pub const JOB_DESCRIPTION_HEADING: &str = "JOB DESCRIPTION";
pub const CANDIDATE_RESUME_HEADING: &str = "CANDIDATE'S RESUME (JSON)";
pub const CANDIDATE_A_HEADING: &str = "CANDIDATE A'S RESUME (JSON)";
pub const CANDIDATE_B_HEADING: &str = "CANDIDATE B'S RESUME (JSON)";
pub const OWN_RESUME_HEADING: &str = "MY RESUME (JSON)";

/// Number of questions requested per interview category.
pub const QUESTIONS_PER_CATEGORY: usize = 3;

pub const PARSE_INSTRUCTIONS: &str = "\
You are an expert resume parser. Extract all information from the provided resume file.
Parse the document and return the data in the requested JSON format.
Use null for fields the document does not contain and empty lists for empty sections.";

pub const JD_COMPARISON_INSTRUCTIONS: &str = "\
You are an expert hiring manager. Analyze the provided candidate's resume against the job description.
Use the candidate's name from the resume.
The match_score is an integer percentage from 0 to 100.";

pub const JD_COMPARISON_CLOSING: &str = "\
Provide a detailed analysis in the required JSON format.";

pub const PEER_COMPARISON_INSTRUCTIONS: &str = "\
You are an expert HR manager. Compare two candidates.
skill_overlap lists the skills that appear in BOTH resumes.";

pub const PEER_COMPARISON_CLOSING: &str = "\
Provide a concise, side-by-side comparison in the required JSON format.";

pub const FEEDBACK_INSTRUCTIONS: &str = "\
You are a friendly and encouraging career coach.
Analyze the provided resume against the job description.
The match_score is an integer percentage from 0 to 100.";

pub const FEEDBACK_CLOSING: &str = "\
Provide a match score, list missing keywords, and give actionable
improvement suggestions on how I can rephrase my experience to
better match the job description.
Return your analysis in the required JSON format.";

/// Interview question instructions. Replace `{count}` before sending.
pub const QUESTIONS_INSTRUCTIONS_TEMPLATE: &str = "\
You are a senior hiring manager. Based on the resume and job description,
generate exactly {count} behavioral, {count} technical, and {count} resume-specific questions.
The 'resume_specific' questions must probe deeper into the candidate's
listed projects or job history and name the concrete role, company, or project they refer to.";

pub const QUESTIONS_CLOSING: &str = "\
Return your questions in the required JSON format.";
