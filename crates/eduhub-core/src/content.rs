//! Shapes of the remote JSON documents the bot serves.

use serde::{Deserialize, Serialize};

/// A group of papers belonging to one exam (e.g. "NEET 2023").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamCategory {
    pub title: String,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

/// A playable quiz paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    #[serde(default)]
    pub exam: String,
    #[serde(default)]
    pub exam_group: String,
    /// Unique key across the whole exams document.
    pub meta_id: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
}

/// Subject of a pool question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Biology,
    Chemistry,
    Physics,
}

impl Subject {
    /// Map a command letter (`b`, `c`, `p`) to a subject.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'b' => Some(Self::Biology),
            'c' => Some(Self::Chemistry),
            'p' => Some(Self::Physics),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Biology => "biology",
            Self::Chemistry => "chemistry",
            Self::Physics => "physics",
        }
    }
}

/// The four lettered answers of a pool question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PoolOptions {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

/// A question from the subject-tagged quiz pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolQuestion {
    pub question: String,
    pub options: PoolOptions,
    /// "A".."D".
    pub correct_option: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl PoolQuestion {
    pub fn is_subject(&self, subject: Subject) -> bool {
        self.subject
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(subject.name()))
    }

    /// Options in A..D order.
    pub fn option_texts(&self) -> [&str; 4] {
        [
            &self.options.a,
            &self.options.b,
            &self.options.c,
            &self.options.d,
        ]
    }

    /// Zero-based index of the correct option, if the letter is valid.
    pub fn correct_index(&self) -> Option<u8> {
        match self.correct_option.trim().to_ascii_uppercase().as_str() {
            "A" => Some(0),
            "B" => Some(1),
            "C" => Some(2),
            "D" => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyqOption {
    pub identifier: String,
    /// HTML fragment.
    pub content: String,
}

/// A previous-year question. Text fields carry HTML markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyqQuestion {
    #[serde(default, rename = "question_id")]
    pub question_id: String,
    #[serde(default)]
    pub marks: Option<f32>,
    #[serde(default)]
    pub neg_marks: Option<f32>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub chapter: String,
    pub content: String,
    #[serde(default)]
    pub options: Vec<PyqOption>,
    #[serde(default, rename = "correct_options")]
    pub correct_options: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

/// A previous-year paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyqPaper {
    #[serde(default)]
    pub questions: Vec<PyqQuestion>,
}

/// The PYQ document is published either as one paper object or as a
/// list of paper objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PyqDocument {
    Single(PyqPaper),
    Many(Vec<PyqPaper>),
}

impl PyqDocument {
    /// All questions across the document.
    pub fn into_questions(self) -> Vec<PyqQuestion> {
        match self {
            Self::Single(paper) => paper.questions,
            Self::Many(papers) => papers.into_iter().flat_map(|p| p.questions).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_text: String,
    #[serde(default)]
    pub quote_author: String,
}

impl Quote {
    /// Author name, or "Unknown" when blank.
    pub fn author(&self) -> &str {
        let author = self.quote_author.trim();
        if author.is_empty() {
            "Unknown"
        } else {
            author
        }
    }
}
