use serde::{Deserialize, Serialize};

use super::{QuizQuestion, QuizSet};

/// Where a run currently is in the answer/explain/result cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Answering,
    Explaining { selected: String, correct: bool },
    Result,
}

/// Outcome of [`QuizRun::submit_answer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    Accepted { correct: bool },
    Ignored,
}

/// Progress of one visitor through one [`QuizSet`].
///
/// The run does not own the quiz; every transition takes the quiz it is
/// walking so the same set can be replayed after [`QuizRun::restart`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRun {
    index: usize,
    score: usize,
    phase: Phase,
}

impl Default for QuizRun {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizRun {
    pub fn new() -> Self {
        Self {
            index: 0,
            score: 0,
            phase: Phase::Answering,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected_option(&self) -> Option<&str> {
        match &self.phase {
            Phase::Explaining { selected, .. } => Some(selected),
            _ => None,
        }
    }

    pub fn is_correct(&self) -> Option<bool> {
        match self.phase {
            Phase::Explaining { correct, .. } => Some(correct),
            _ => None,
        }
    }

    pub fn show_explanation(&self) -> bool {
        matches!(self.phase, Phase::Explaining { .. })
    }

    pub fn show_result(&self) -> bool {
        matches!(self.phase, Phase::Result)
    }

    pub fn current_question<'q>(&self, quiz: &'q QuizSet) -> Option<&'q QuizQuestion> {
        quiz.question(self.index)
    }

    /// Records an answer for the current question.
    ///
    /// Only honored while answering; a second click during the explanation
    /// or after the result is shown leaves the run untouched.
    pub fn submit_answer(&mut self, quiz: &QuizSet, option: &str) -> Submission {
        if self.phase != Phase::Answering {
            return Submission::Ignored;
        }
        let Some(question) = self.current_question(quiz) else {
            return Submission::Ignored;
        };

        let correct = question.is_correct(option);
        if correct {
            self.score += 1;
        }
        self.phase = Phase::Explaining {
            selected: option.to_string(),
            correct,
        };
        Submission::Accepted { correct }
    }

    /// Moves past the explanation, either to the next question or to the
    /// result. Returns `false` when nothing changed.
    pub fn advance(&mut self, quiz: &QuizSet) -> bool {
        if !self.show_explanation() {
            return false;
        }
        if self.index + 1 < quiz.len() {
            self.index += 1;
            self.phase = Phase::Answering;
        } else {
            self.phase = Phase::Result;
        }
        true
    }

    pub fn restart(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::quiz::sample_question;

    fn two_question_quiz() -> QuizSet {
        QuizSet {
            id: "daily".to_string(),
            title: "Bhagavad Gita Quiz".to_string(),
            questions: vec![
                sample_question(
                    "Who is the speaker of Bhagavad Gita?",
                    ["Arjuna", "Krishna", "Bhishma", "Duryodhana"],
                    "Krishna",
                ),
                sample_question(
                    "How many chapters are there in Bhagavad Gita?",
                    ["18", "12", "15", "20"],
                    "18",
                ),
            ],
        }
    }

    fn play(quiz: &QuizSet, answers: &[&str]) -> QuizRun {
        let mut run = QuizRun::new();
        for answer in answers {
            run.submit_answer(quiz, answer);
            run.advance(quiz);
        }
        run
    }

    #[test]
    fn new_run_is_answering_first_question() {
        let run = QuizRun::new();
        assert_eq!(run.index(), 0);
        assert_eq!(run.score(), 0);
        assert_eq!(run.selected_option(), None);
        assert_eq!(run.is_correct(), None);
        assert!(!run.show_explanation());
        assert!(!run.show_result());
    }

    #[test]
    fn one_of_two_correct_scores_one() {
        let quiz = two_question_quiz();
        let run = play(&quiz, &["Krishna", "12"]);
        assert!(run.show_result());
        assert_eq!(run.score(), 1);
    }

    #[test]
    fn correct_answer_moves_to_explaining() {
        let quiz = two_question_quiz();
        let mut run = QuizRun::new();

        let outcome = run.submit_answer(&quiz, "Krishna");

        assert_eq!(outcome, Submission::Accepted { correct: true });
        assert_eq!(run.score(), 1);
        assert_eq!(run.selected_option(), Some("Krishna"));
        assert_eq!(run.is_correct(), Some(true));
        assert!(run.show_explanation());
    }

    #[test]
    fn second_submit_while_explaining_is_ignored() {
        let quiz = two_question_quiz();
        let mut run = QuizRun::new();

        run.submit_answer(&quiz, "Arjuna");
        let before = run.clone();
        let outcome = run.submit_answer(&quiz, "Krishna");

        assert_eq!(outcome, Submission::Ignored);
        assert_eq!(run, before);
        assert_eq!(run.score(), 0);
        assert_eq!(run.selected_option(), Some("Arjuna"));
    }

    #[test]
    fn advance_only_from_explaining() {
        let quiz = two_question_quiz();
        let mut run = QuizRun::new();

        assert!(!run.advance(&quiz));
        assert_eq!(run.index(), 0);

        run.submit_answer(&quiz, "Krishna");
        assert!(run.advance(&quiz));
        assert_eq!(run.index(), 1);
        assert_eq!(run.phase(), &Phase::Answering);
        assert_eq!(run.selected_option(), None);
    }

    #[test]
    fn last_question_advances_to_result() {
        let quiz = two_question_quiz();
        let mut run = play(&quiz, &["Krishna"]);
        run.submit_answer(&quiz, "18");
        run.advance(&quiz);

        assert!(run.show_result());
        assert_eq!(run.index(), 1);
        assert_eq!(run.score(), 2);
        assert_eq!(run.submit_answer(&quiz, "18"), Submission::Ignored);
        assert!(!run.advance(&quiz));
        assert_eq!(run.score(), 2);
    }

    #[test]
    fn restart_resets_from_any_phase() {
        let quiz = two_question_quiz();

        let mut explaining = QuizRun::new();
        explaining.submit_answer(&quiz, "Krishna");
        let mut finished = play(&quiz, &["Krishna", "18"]);
        let mut fresh = QuizRun::new();

        for run in [&mut explaining, &mut finished, &mut fresh] {
            run.restart();
            assert_eq!(*run, QuizRun::new());
        }
    }

    #[test]
    fn score_matches_correct_answers_and_is_bounded() {
        let quiz = two_question_quiz();
        let choices = [
            ["Krishna", "18"],
            ["Krishna", "12"],
            ["Arjuna", "18"],
            ["Arjuna", "20"],
        ];
        for answers in choices {
            let run = play(&quiz, &answers);
            let expected = quiz
                .questions
                .iter()
                .zip(answers)
                .filter(|(q, a)| q.correct_answer == *a)
                .count();
            assert_eq!(run.score(), expected);
            assert!(run.score() <= quiz.len());
        }
    }

    #[test]
    fn empty_quiz_never_transitions() {
        let quiz = QuizSet {
            id: "empty".to_string(),
            title: "Empty".to_string(),
            questions: Vec::new(),
        };
        let mut run = QuizRun::new();
        assert_eq!(run.current_question(&quiz), None);
        assert_eq!(run.submit_answer(&quiz, "x"), Submission::Ignored);
        assert!(!run.advance(&quiz));
        assert_eq!(run, QuizRun::new());
    }

    #[test]
    fn run_state_survives_json_round_trip() {
        let quiz = two_question_quiz();
        let mut run = QuizRun::new();
        run.submit_answer(&quiz, "Bhishma");

        let json = serde_json::to_string(&run).unwrap();
        let restored: QuizRun = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, run);
    }
}
