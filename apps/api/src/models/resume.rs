use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::schema::{array_of, nullable_string, object, string, OutputSchema};

/// A single education entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: Option<String>,
    pub university: Option<String>,
    pub graduation_year: Option<String>,
}

/// A single work experience entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: Option<String>,
    pub company: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

/// Structured resume extracted by the oracle from an uploaded document.
///
/// Scalar fields may be absent or null; list fields must be present (an
/// empty list encodes "nothing found").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
}

impl ParsedResume {
    /// Name to show for this candidate, falling back to the upload's file name.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
    }
}

impl OutputSchema for ParsedResume {
    const NAME: &'static str = "ParsedResume";

    fn response_schema() -> Value {
        let education = object(
            &[
                ("degree", nullable_string("e.g., M.S. in Computer Science")),
                ("university", nullable_string("e.g., AI University")),
                ("graduation_year", nullable_string("e.g., 2024")),
            ],
            &[],
        );
        let experience = object(
            &[
                ("title", nullable_string("e.g., Senior Software Engineer")),
                ("company", nullable_string("e.g., Tech Innovations Inc.")),
                ("duration", nullable_string("e.g., 2022-Present")),
                ("description", nullable_string("Key responsibilities")),
            ],
            &[],
        );
        object(
            &[
                ("name", nullable_string("Full name")),
                ("email", nullable_string("Email address")),
                ("phone", nullable_string("Phone number")),
                ("summary", nullable_string("Professional summary")),
                ("skills", array_of(string("A skill"), "List of skills")),
                ("education", array_of(education, "Education history")),
                ("experience", array_of(experience, "Work history")),
            ],
            &["skills", "education", "experience"],
        )
    }
}
