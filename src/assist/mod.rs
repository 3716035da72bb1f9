pub mod chat;
pub mod llm;
pub mod quiz;
pub mod summary;

use serde::{Deserialize, Serialize};

/// One multiple-choice question about a paragraph.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl QuizQuestion {
    /// Shape check applied to model output before it reaches the UI.
    pub fn is_well_formed(&self) -> bool {
        !self.question.is_empty()
            && self.options.len() == 4
            && self.options.iter().all(|o| !o.is_empty())
            && self.correct_answer < 4
    }
}

/// Verdict on a learner-written paragraph summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReview {
    pub is_valid: bool,
    pub feedback: String,
    pub score: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_requires_four_options_and_valid_answer() {
        let mut question = QuizQuestion {
            question: "Which?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 3,
        };
        assert!(question.is_well_formed());

        question.correct_answer = 4;
        assert!(!question.is_well_formed());

        question.correct_answer = 0;
        question.options.pop();
        assert!(!question.is_well_formed());
    }

    #[test]
    fn wire_format_uses_camel_case_and_lowercase_roles() {
        let question = QuizQuestion {
            question: "Q".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 1,
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["correctAnswer"], 1);

        let message = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(message["role"], "user");
    }
}
