use anyhow::{Result, bail};

use crate::assist::llm::{ChatClient, extract_json};
use crate::assist::{Message, QuizQuestion};

const QUIZ_SYSTEM: &str = "You write reading-comprehension quizzes. Given a paragraph, reply \
     with ONLY a JSON array of question objects shaped as \
     {\"question\": string, \"options\": [string, string, string, string], \
     \"correctAnswer\": 0-3}. Write three questions that test understanding \
     of the paragraph, not trivia about its wording.";

/// Long paragraphs carry enough material for a fourth question.
const LONG_TEXT_CHARS: usize = 500;

/// Quiz questions for one paragraph: the model's if it cooperates, the
/// built-in templates otherwise. Never fails.
pub fn quiz_for(text: &str, client: Option<&ChatClient>) -> Vec<QuizQuestion> {
    if let Some(client) = client {
        if let Ok(questions) = model_questions(client, text) {
            return questions;
        }
    }
    fallback_questions(text)
}

fn model_questions(client: &ChatClient, text: &str) -> Result<Vec<QuizQuestion>> {
    let reply = client.complete(QUIZ_SYSTEM, &[Message::user(text)])?;
    let questions: Vec<QuizQuestion> = serde_json::from_str(extract_json(&reply, '[', ']'))?;
    if questions.is_empty() || !questions.iter().all(QuizQuestion::is_well_formed) {
        bail!("model quiz failed shape validation");
    }
    Ok(questions)
}

/// Generic placeholder questions; a downgraded experience, not an error.
fn fallback_questions(text: &str) -> Vec<QuizQuestion> {
    let word_count = text.split_whitespace().count();

    let mut questions = vec![
        QuizQuestion {
            question: format!(
                "Based on this paragraph of roughly {word_count} words, what would be the most \
                 likely conclusion?"
            ),
            options: vec![
                "The topic is widely understood".into(),
                "There are competing perspectives on this topic".into(),
                "More research is needed".into(),
                "The evidence is inconclusive".into(),
            ],
            correct_answer: 1,
        },
        QuizQuestion {
            question: "Which of these statements best represents the main idea?".into(),
            options: vec![
                "A comprehensive explanation of the concept".into(),
                "A historical overview of the subject".into(),
                "A comparison of different approaches".into(),
                "An argument for a specific position".into(),
            ],
            correct_answer: 3,
        },
        QuizQuestion {
            question: "What can be inferred from the paragraph?".into(),
            options: vec![
                "The author supports traditional viewpoints".into(),
                "The author is challenging conventional wisdom".into(),
                "The author is presenting a balanced perspective".into(),
                "The author is introducing a new concept".into(),
            ],
            correct_answer: 2,
        },
    ];

    if text.chars().count() > LONG_TEXT_CHARS {
        questions.push(QuizQuestion {
            question: "What would be the best title for this longer paragraph?".into(),
            options: vec![
                "Understanding Complex Systems".into(),
                "Historical Perspectives on the Topic".into(),
                "A New Approach to Problem Solving".into(),
                "Comparing Theoretical Models".into(),
            ],
            correct_answer: 0,
        });
    }

    questions
}
