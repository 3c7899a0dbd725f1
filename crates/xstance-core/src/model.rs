//! Core data model types for X-Stance.
//!
//! Records are decoded from the dataset's JSON-lines files. Language and test
//! set are kept as raw strings on the record and parsed into the closed enums
//! below only when an operation needs them, so that a bad value surfaces as a
//! domain error rather than a JSON decoding failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::XStanceError;

/// One question/comment pair from an X-Stance JSON-lines file.
///
/// Extra fields in the file (`id`, `topic`, `author`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The question the comment answers.
    #[serde(default)]
    pub question: String,
    /// The commenter's free-text answer.
    #[serde(default)]
    pub comment: String,
    /// Stance label (`FAVOR` / `AGAINST`), or an integer index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<RawLabel>,
    /// Language code of the comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Test set the record belongs to (only present in test files).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_set: Option<String>,
}

impl Record {
    /// Parse the record's language. `index` is the record position, used in errors.
    pub fn language(&self, index: usize) -> Result<Language, XStanceError> {
        self.language
            .as_deref()
            .ok_or(XStanceError::MissingField {
                index,
                field: "language",
            })?
            .parse()
    }

    /// Parse the record's test set. `index` is the record position, used in errors.
    pub fn test_set(&self, index: usize) -> Result<TestSet, XStanceError> {
        self.test_set
            .as_deref()
            .ok_or(XStanceError::MissingField {
                index,
                field: "test_set",
            })?
            .parse()
    }
}

/// A label as it appears in the input: either a string or a JSON integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Integer(i64),
    Text(String),
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLabel::Integer(i) => write!(f, "{i}"),
            RawLabel::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawLabel {
    fn from(s: &str) -> Self {
        RawLabel::Text(s.to_string())
    }
}

impl From<i64> for RawLabel {
    fn from(i: i64) -> Self {
        RawLabel::Integer(i)
    }
}

/// A single line of a predictions file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub label: RawLabel,
}

impl PredictionRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: RawLabel::Text(label.into()),
        }
    }
}

/// Languages covered by X-Stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    Fr,
    It,
}

impl Language {
    /// All languages, in reporting order.
    pub const ALL: [Language; 3] = [Language::De, Language::Fr, Language::It];

    /// The ISO 639-1 code used in the dataset.
    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::Fr => "fr",
            Language::It => "it",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = XStanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "de" => Ok(Language::De),
            "fr" => Ok(Language::Fr),
            "it" => Ok(Language::It),
            other => Err(XStanceError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// The X-Stance test sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSet {
    NewCommentsDefr,
    NewQuestionsDefr,
    NewTopicsDefr,
    NewCommentsIt,
    NewQuestionsIt,
    NewTopicsIt,
}

impl TestSet {
    /// Test sets that are scored, in reporting order.
    pub const EVALUATED: [TestSet; 4] = [
        TestSet::NewCommentsDefr,
        TestSet::NewQuestionsDefr,
        TestSet::NewTopicsDefr,
        TestSet::NewCommentsIt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TestSet::NewCommentsDefr => "new_comments_defr",
            TestSet::NewQuestionsDefr => "new_questions_defr",
            TestSet::NewTopicsDefr => "new_topics_defr",
            TestSet::NewCommentsIt => "new_comments_it",
            TestSet::NewQuestionsIt => "new_questions_it",
            TestSet::NewTopicsIt => "new_topics_it",
        }
    }
}

impl fmt::Display for TestSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestSet {
    type Err = XStanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_comments_defr" => Ok(TestSet::NewCommentsDefr),
            "new_questions_defr" => Ok(TestSet::NewQuestionsDefr),
            "new_topics_defr" => Ok(TestSet::NewTopicsDefr),
            "new_comments_it" => Ok(TestSet::NewCommentsIt),
            "new_questions_it" => Ok(TestSet::NewQuestionsIt),
            "new_topics_it" => Ok(TestSet::NewTopicsIt),
            other => Err(XStanceError::UnsupportedTestSet(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_display_and_parse() {
        assert_eq!(Language::De.to_string(), "de");
        assert_eq!("fr".parse::<Language>().unwrap(), Language::Fr);
        assert_eq!("it".parse::<Language>().unwrap(), Language::It);
        assert_eq!(
            "rm".parse::<Language>(),
            Err(XStanceError::UnsupportedLanguage("rm".into()))
        );
        // Codes are matched exactly.
        assert!("DE".parse::<Language>().is_err());
    }

    #[test]
    fn test_set_names_roundtrip() {
        for set in [
            TestSet::NewCommentsDefr,
            TestSet::NewQuestionsDefr,
            TestSet::NewTopicsDefr,
            TestSet::NewCommentsIt,
            TestSet::NewQuestionsIt,
            TestSet::NewTopicsIt,
        ] {
            assert_eq!(set.name().parse::<TestSet>().unwrap(), set);
        }
        assert!(matches!(
            "new_users".parse::<TestSet>(),
            Err(XStanceError::UnsupportedTestSet(_))
        ));
    }

    #[test]
    fn italian_question_and_topic_sets_are_disabled() {
        assert_eq!(TestSet::EVALUATED.len(), 4);
        assert!(!TestSet::EVALUATED.contains(&TestSet::NewQuestionsIt));
        assert!(!TestSet::EVALUATED.contains(&TestSet::NewTopicsIt));
    }

    #[test]
    fn record_decodes_string_and_integer_labels() {
        let line = r#"{"id": 1, "question": "Q?", "comment": "C.", "label": "FAVOR", "language": "de", "topic": "Economy"}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.label, Some(RawLabel::Text("FAVOR".into())));
        assert_eq!(record.language(0).unwrap(), Language::De);
        assert_eq!(
            record.test_set(0),
            Err(XStanceError::MissingField {
                index: 0,
                field: "test_set"
            })
        );

        let record: Record =
            serde_json::from_str(r#"{"question": "Q?", "comment": "C.", "label": 1}"#).unwrap();
        assert_eq!(record.label, Some(RawLabel::Integer(1)));
        assert_eq!(record.label.unwrap().to_string(), "1");
    }

    #[test]
    fn prediction_record_serializes_plain_label() {
        let json = serde_json::to_string(&PredictionRecord::new("AGAINST")).unwrap();
        assert_eq!(json, r#"{"label":"AGAINST"}"#);
    }
}
