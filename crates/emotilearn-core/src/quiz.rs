//! Emotion-adaptive quiz selection and scoring.

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabel;
use crate::error::{CoreError, NoActiveQuizReason, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
    pub difficulty: Difficulty,
}

/// Read-only question bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, rename = "question")]
    pub questions: Vec<Question>,
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parse a catalog of `[[question]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog =
            toml::from_str(content).map_err(|e| ValidationError::InvalidValue {
                field: "catalog".into(),
                message: e.to_string(),
            })?;
        for q in &catalog.questions {
            if q.correct_index >= q.options.len() {
                return Err(ValidationError::OutOfBounds {
                    collection: format!("options of question {}", q.id),
                    index: q.correct_index,
                    len: q.options.len(),
                }
                .into());
            }
        }
        Ok(catalog)
    }

    /// The built-in five-question bank.
    pub fn builtin() -> Self {
        fn q(
            id: u32,
            prompt: &str,
            options: [&str; 4],
            correct_index: usize,
            explanation: &str,
            difficulty: Difficulty,
        ) -> Question {
            Question {
                id,
                prompt: prompt.into(),
                options: options.iter().map(|o| o.to_string()).collect(),
                correct_index,
                explanation: explanation.into(),
                difficulty,
            }
        }

        Self::new(vec![
            q(
                1,
                "What is the primary purpose of the mitochondria in a cell?",
                ["Protein synthesis", "Energy production", "Waste removal", "DNA storage"],
                1,
                "Mitochondria convert glucose into ATP, the cell's energy currency.",
                Difficulty::Easy,
            ),
            q(
                2,
                "Which programming concept allows a function to call itself?",
                ["Iteration", "Recursion", "Inheritance", "Polymorphism"],
                1,
                "A recursive function calls itself with smaller inputs until it reaches a base case.",
                Difficulty::Medium,
            ),
            q(
                3,
                "What is the derivative of x² + 3x + 2?",
                ["2x + 3", "x² + 3", "2x + 2", "3x + 2"],
                0,
                "By the power rule: 2x from x², 3 from 3x, 0 from the constant.",
                Difficulty::Medium,
            ),
            q(
                4,
                "Which planet is closest to the Sun?",
                ["Venus", "Earth", "Mercury", "Mars"],
                2,
                "Mercury has the innermost orbit in the solar system.",
                Difficulty::Easy,
            ),
            q(
                5,
                "What is the time complexity of binary search?",
                ["O(n)", "O(log n)", "O(n²)", "O(1)"],
                1,
                "Each comparison halves the search space.",
                Difficulty::Hard,
            ),
        ])
    }
}

/// Outcome of a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub questions: Vec<Question>,
    /// The tier filter matched nothing and the full catalog was used.
    pub fell_back: bool,
}

/// Filter `catalog` for `label`, preserving catalog order.
///
/// Never returns an empty set unless the catalog itself is empty.
pub fn select(label: EmotionLabel, catalog: &[Question]) -> Selection {
    let keep: fn(&Question) -> bool = match label {
        EmotionLabel::Frustrated | EmotionLabel::Sad => |q| q.difficulty == Difficulty::Easy,
        EmotionLabel::Bored => |q| q.difficulty == Difficulty::Hard,
        EmotionLabel::Happy | EmotionLabel::Focused => |_| true,
        _ => |q| q.difficulty != Difficulty::Hard,
    };
    let filtered: Vec<Question> = catalog.iter().filter(|q| keep(q)).cloned().collect();
    if filtered.is_empty() && !catalog.is_empty() {
        tracing::warn!(%label, "no questions match emotion tier; using full catalog");
        return Selection {
            questions: catalog.to_vec(),
            fell_back: true,
        };
    }
    Selection {
        questions: filtered,
        fell_back: false,
    }
}

/// Encouragement line shown above the quiz.
pub fn encouragement_for(label: EmotionLabel) -> &'static str {
    match label {
        EmotionLabel::Frustrated => "Take your time - every small step forward is progress!",
        EmotionLabel::Bored => "Let's challenge your mind with some exciting problems!",
        EmotionLabel::Happy => "Your positive energy is perfect for learning new things!",
        EmotionLabel::Focused => "Great focus! You're in the perfect state for deep learning.",
        _ => "You've got this! Let's learn something new together.",
    }
}

/// Result of one answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub question_id: u32,
    pub selected_index: usize,
    pub correct: bool,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAdvance {
    /// Moved to the question at this index.
    Next(usize),
    /// The last question was already showing; the run is over.
    Finished,
}

/// One quiz run. Created on entering Quiz mode, dropped on leaving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    emotion: EmotionLabel,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    /// Selected option per answered question, in answer order.
    answered: Vec<usize>,
    finished: bool,
}

impl QuizSession {
    pub fn new(emotion: EmotionLabel, catalog: &[Question]) -> Self {
        let Selection { questions, .. } = select(emotion, catalog);
        Self {
            emotion,
            questions,
            current_index: 0,
            score: 0,
            answered: Vec::new(),
            finished: false,
        }
    }

    pub fn emotion(&self) -> EmotionLabel {
        self.emotion
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answered(&self) -> &[usize] {
        &self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_answered(&self) -> bool {
        self.answered.len() > self.current_index
    }

    /// 0 .. 100, rounded.
    pub fn percent(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        ((self.score as f64 / self.questions.len() as f64) * 100.0).round() as u32
    }

    /// Submit an answer for the current question. Final once accepted.
    pub fn submit(&mut self, selected_index: usize) -> Result<AnswerOutcome> {
        if self.finished {
            return Err(CoreError::NoActiveQuiz(NoActiveQuizReason::QuizFinished));
        }
        if self.current_answered() {
            return Err(CoreError::NoActiveQuiz(NoActiveQuizReason::AlreadyAnswered));
        }
        let question = self
            .current()
            .ok_or(CoreError::NoActiveQuiz(NoActiveQuizReason::QuizFinished))?;
        if selected_index >= question.options.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "options".into(),
                index: selected_index,
                len: question.options.len(),
            }
            .into());
        }
        let correct = selected_index == question.correct_index;
        let question_id = question.id;
        if correct {
            self.score += 1;
        }
        self.answered.push(selected_index);
        Ok(AnswerOutcome {
            question_id,
            selected_index,
            correct,
            score: self.score,
        })
    }

    /// Move past the current, answered question.
    pub fn advance(&mut self) -> Result<QuizAdvance> {
        if self.finished {
            return Err(CoreError::NoActiveQuiz(NoActiveQuizReason::QuizFinished));
        }
        if !self.current_answered() {
            return Err(CoreError::QuestionNotAnswered);
        }
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            Ok(QuizAdvance::Next(self.current_index))
        } else {
            self.finished = true;
            Ok(QuizAdvance::Finished)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(questions: &[Question]) -> Vec<u32> {
        questions.iter().map(|q| q.id).collect()
    }

    #[test]
    fn selection_per_emotion() {
        let catalog = Catalog::builtin().questions;
        assert_eq!(ids(&select(EmotionLabel::Sad, &catalog).questions), vec![1, 4]);
        assert_eq!(ids(&select(EmotionLabel::Frustrated, &catalog).questions), vec![1, 4]);
        assert_eq!(ids(&select(EmotionLabel::Bored, &catalog).questions), vec![5]);
        assert_eq!(select(EmotionLabel::Happy, &catalog).questions, catalog);
        assert_eq!(select(EmotionLabel::Focused, &catalog).questions, catalog);
        assert_eq!(ids(&select(EmotionLabel::Neutral, &catalog).questions), vec![1, 2, 3, 4]);
        assert_eq!(ids(&select(EmotionLabel::Angry, &catalog).questions), vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_tier_falls_back_to_full_catalog() {
        let catalog: Vec<Question> = Catalog::builtin()
            .questions
            .into_iter()
            .filter(|q| q.difficulty != Difficulty::Hard)
            .collect();
        let selection = select(EmotionLabel::Bored, &catalog);
        assert!(selection.fell_back);
        assert_eq!(selection.questions, catalog);
    }

    #[test]
    fn answers_are_final() {
        let mut quiz = QuizSession::new(EmotionLabel::Bored, &Catalog::builtin().questions);
        let outcome = quiz.submit(1).unwrap();
        assert!(outcome.correct);
        assert_eq!(quiz.score(), 1);

        let err = quiz.submit(0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NoActiveQuiz(NoActiveQuizReason::AlreadyAnswered)
        ));
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.answered(), &[1]);
    }

    #[test]
    fn rejects_option_out_of_range() {
        let mut quiz = QuizSession::new(EmotionLabel::Happy, &Catalog::builtin().questions);
        assert!(matches!(
            quiz.submit(9),
            Err(CoreError::Validation(ValidationError::OutOfBounds { index: 9, .. }))
        ));
        assert!(quiz.answered().is_empty());
    }

    #[test]
    fn advance_requires_answer_and_finishes_on_last() {
        let mut quiz = QuizSession::new(EmotionLabel::Sad, &Catalog::builtin().questions);
        assert!(matches!(quiz.advance(), Err(CoreError::QuestionNotAnswered)));

        quiz.submit(1).unwrap();
        assert_eq!(quiz.advance().unwrap(), QuizAdvance::Next(1));
        quiz.submit(0).unwrap();
        assert_eq!(quiz.advance().unwrap(), QuizAdvance::Finished);
        assert!(quiz.is_finished());
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.percent(), 50);
    }

    #[test]
    fn parses_catalog_from_toml() {
        let toml = r#"
            [[question]]
            id = 10
            prompt = "2 + 2?"
            options = ["3", "4"]
            correct_index = 1
            difficulty = "easy"
        "#;
        let catalog = Catalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.questions.len(), 1);
        assert_eq!(catalog.questions[0].difficulty, Difficulty::Easy);

        let bad = toml.replace("correct_index = 1", "correct_index = 5");
        assert!(Catalog::from_toml_str(&bad).is_err());
    }
}
