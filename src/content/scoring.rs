//! Quiz Scoring Engine - the single implementation of result
//! computation, shared by the API and mirrored verbatim by the JS the
//! exporter embeds. Keeping one module here is what stops the live and
//! exported players drifting apart.

use rand::Rng;
use serde_json::Value;

use super::quiz::{Quiz, QuizMode, QuizOption, QuizResult};

/// Result-type tags in their fixed iteration order. Ties in `type`
/// mode resolve to the first tag encountered in this order.
pub const SCORE_TAGS: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

/// Where the session stands after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Next 0-based question index to present.
    Question(usize),
    /// All questions answered; a result can be computed.
    Finished,
}

/// One play-through of a quiz. Holds the running per-tag totals and the
/// test-mode correct count; the quiz definition itself is borrowed and
/// never mutated.
#[derive(Debug)]
pub struct QuizSession<'a> {
    quiz: &'a Quiz,
    current_step: usize,
    answers: Vec<usize>,
    scores: [i64; SCORE_TAGS.len()],
    correct_count: usize,
}

impl<'a> QuizSession<'a> {
    pub fn new(quiz: &'a Quiz) -> Self {
        QuizSession {
            quiz,
            current_step: 0,
            answers: Vec::with_capacity(quiz.questions.len()),
            scores: [0; SCORE_TAGS.len()],
            correct_count: 0,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn is_finished(&self) -> bool {
        self.current_step >= self.quiz.questions.len()
    }

    pub fn scores(&self) -> &[i64; SCORE_TAGS.len()] {
        &self.scores
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Record the chosen option for the current question, fold it into
    /// the mode's accumulator and advance. Out-of-range option indexes
    /// are recorded but contribute nothing; submitting after the last
    /// question is a no-op.
    pub fn submit_answer(&mut self, option_index: usize) -> StepOutcome {
        if self.is_finished() {
            return StepOutcome::Finished;
        }

        self.answers.push(option_index);
        let option = self.quiz.questions[self.current_step]
            .options
            .get(option_index);

        if let Some(option) = option {
            match self.quiz.mode {
                QuizMode::Type => self.accumulate_type(option),
                QuizMode::Test => {
                    if option.score.get("A").map(coerce_points).unwrap_or(0) == 1 {
                        self.correct_count += 1;
                    }
                }
                QuizMode::Fortune => {}
            }
        }

        self.current_step += 1;
        if self.is_finished() {
            StepOutcome::Finished
        } else {
            StepOutcome::Question(self.current_step)
        }
    }

    fn accumulate_type(&mut self, option: &QuizOption) {
        for (i, tag) in SCORE_TAGS.iter().enumerate() {
            if let Some(points) = option.score.get(*tag) {
                self.scores[i] += coerce_points(points);
            }
        }
    }

    /// Compute the diagnostic result once every question is answered.
    /// Returns `None` while questions remain or when the quiz has no
    /// results at all; every other malformed shape falls back instead
    /// of failing, to stay compatible with historical records.
    pub fn result(&self) -> Option<&'a QuizResult> {
        if !self.is_finished() {
            return None;
        }
        score_answers(
            self.quiz,
            &self.scores,
            self.correct_count,
            &mut rand::thread_rng(),
        )
    }
}

/// Replay an ordered answer list from scratch. This is the pure
/// `scoreQuiz(quiz, answers)` contract: feeding the same list twice
/// yields the same result (fortune mode excepted, by definition).
pub fn score_quiz<'a>(quiz: &'a Quiz, answers: &[usize]) -> Option<&'a QuizResult> {
    let mut session = QuizSession::new(quiz);
    for &answer in answers {
        session.submit_answer(answer);
    }
    session.result()
}

fn score_answers<'a, R: Rng>(
    quiz: &'a Quiz,
    scores: &[i64; SCORE_TAGS.len()],
    correct_count: usize,
    rng: &mut R,
) -> Option<&'a QuizResult> {
    if quiz.results.is_empty() {
        return None;
    }
    let index = match quiz.mode {
        QuizMode::Type => {
            let tag = winning_tag(scores);
            return quiz
                .results
                .iter()
                .find(|r| r.result_type == tag)
                .or_else(|| quiz.results.first());
        }
        QuizMode::Test => test_result_index(correct_count, quiz.questions.len(), quiz.results.len()),
        QuizMode::Fortune => rng.gen_range(0..quiz.results.len()),
    };
    quiz.results.get(index)
}

/// The tag with the strictly greatest total; ties go to the tag that
/// comes first in [`SCORE_TAGS`] order.
fn winning_tag(scores: &[i64; SCORE_TAGS.len()]) -> &'static str {
    let mut best = 0;
    for i in 1..SCORE_TAGS.len() {
        if scores[i] > scores[best] {
            best = i;
        }
    }
    SCORE_TAGS[best]
}

/// Maps the correctness ratio onto a results list ordered best (index
/// 0) to worst: `floor((1 - ratio) * result_count)`, clamped to the
/// last index. A perfect score always selects index 0.
fn test_result_index(correct_count: usize, question_count: usize, result_count: usize) -> usize {
    if question_count == 0 || correct_count >= question_count {
        return 0;
    }
    let ratio = correct_count as f64 / question_count as f64;
    let index = ((1.0 - ratio) * result_count as f64).floor() as usize;
    index.min(result_count.saturating_sub(1))
}

/// Historical score maps hold numbers, numeric strings and junk; junk
/// contributes 0.
fn coerce_points(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f.trunc() as i64).unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::quiz::{Question, QuizOption};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn option(label: &str, score: Value) -> QuizOption {
        serde_json::from_value(json!({ "label": label, "score": score })).unwrap()
    }

    fn result(tag: &str, title: &str) -> crate::content::quiz::QuizResult {
        serde_json::from_value(json!({ "type": tag, "title": title, "description": "" })).unwrap()
    }

    fn type_quiz() -> Quiz {
        Quiz {
            mode: QuizMode::Type,
            questions: vec![
                Question {
                    text: "q1".into(),
                    options: vec![
                        option("a", json!({ "A": 2, "B": 1 })),
                        option("b", json!({ "B": 2 })),
                    ],
                },
                Question {
                    text: "q2".into(),
                    options: vec![
                        option("a", json!({ "A": 1 })),
                        option("b", json!({ "B": 1, "C": 3 })),
                    ],
                },
            ],
            results: vec![result("A", "Type A"), result("B", "Type B"), result("C", "Type C")],
            ..Quiz::default()
        }
    }

    #[test]
    fn test_type_mode_accumulates_and_picks_highest() {
        let quiz = type_quiz();
        let picked = score_quiz(&quiz, &[1, 1]).unwrap();
        // B: 2, C: 3 -> C wins.
        assert_eq!(picked.title, "Type C");
    }

    #[test]
    fn test_type_mode_tie_breaks_to_first_tag_in_order() {
        let mut quiz = type_quiz();
        quiz.questions = vec![Question {
            text: "q".into(),
            options: vec![option("a", json!({ "A": 2, "B": 2 }))],
        }];
        for _ in 0..10 {
            let picked = score_quiz(&quiz, &[0]).unwrap();
            assert_eq!(picked.title, "Type A");
        }
    }

    #[test]
    fn test_type_mode_unmatched_tag_falls_back_to_first_result() {
        let mut quiz = type_quiz();
        // Only a D score, but no D result exists.
        quiz.questions = vec![Question {
            text: "q".into(),
            options: vec![option("a", json!({ "D": 5 }))],
        }];
        let picked = score_quiz(&quiz, &[0]).unwrap();
        assert_eq!(picked.title, "Type A");
    }

    #[test]
    fn test_type_mode_non_numeric_points_contribute_zero() {
        let mut quiz = type_quiz();
        quiz.questions = vec![Question {
            text: "q".into(),
            options: vec![option("a", json!({ "A": "oops", "B": 1, "C": null }))],
        }];
        let picked = score_quiz(&quiz, &[0]).unwrap();
        assert_eq!(picked.title, "Type B");
    }

    #[test]
    fn test_scoring_is_idempotent_across_replays() {
        let quiz = type_quiz();
        let first = score_quiz(&quiz, &[0, 1]).unwrap().title.clone();
        let second = score_quiz(&quiz, &[0, 1]).unwrap().title.clone();
        assert_eq!(first, second);
    }

    fn test_quiz(question_count: usize, result_count: usize) -> Quiz {
        Quiz {
            mode: QuizMode::Test,
            questions: (0..question_count)
                .map(|_| Question {
                    text: "q".into(),
                    options: vec![
                        option("right", json!({ "A": 1 })),
                        option("wrong", json!({ "A": 0 })),
                    ],
                })
                .collect(),
            results: (0..result_count)
                .map(|i| result("", &format!("Rank {}", i)))
                .collect(),
            ..Quiz::default()
        }
    }

    #[test]
    fn test_test_mode_perfect_score_selects_first_result() {
        for result_count in [1, 2, 3, 7] {
            let quiz = test_quiz(4, result_count);
            let picked = score_quiz(&quiz, &[0, 0, 0, 0]).unwrap();
            assert_eq!(picked.title, "Rank 0");
        }
    }

    #[test]
    fn test_test_mode_zero_score_clamps_to_last_result() {
        let quiz = test_quiz(4, 3);
        // ratio 0 -> floor(1.0 * 3) = 3, clamped to 2.
        let picked = score_quiz(&quiz, &[1, 1, 1, 1]).unwrap();
        assert_eq!(picked.title, "Rank 2");
    }

    #[test]
    fn test_test_mode_half_score_lands_mid_list() {
        let quiz = test_quiz(4, 4);
        // ratio 0.5 -> floor(0.5 * 4) = 2.
        let picked = score_quiz(&quiz, &[0, 0, 1, 1]).unwrap();
        assert_eq!(picked.title, "Rank 2");
    }

    #[test]
    fn test_fortune_mode_picks_within_range() {
        let quiz = Quiz {
            mode: QuizMode::Fortune,
            questions: vec![Question {
                text: "q".into(),
                options: vec![option("a", json!({}))],
            }],
            results: vec![result("", "r0"), result("", "r1"), result("", "r2")],
            ..Quiz::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let scores = [0; SCORE_TAGS.len()];
        for _ in 0..50 {
            let picked = score_answers(&quiz, &scores, 0, &mut rng).unwrap();
            assert!(picked.title.starts_with('r'));
        }
    }

    #[test]
    fn test_empty_results_yields_none() {
        let mut quiz = type_quiz();
        quiz.results.clear();
        assert!(score_quiz(&quiz, &[0, 0]).is_none());
    }

    #[test]
    fn test_result_unavailable_until_finished() {
        let quiz = type_quiz();
        let mut session = QuizSession::new(&quiz);
        assert!(session.result().is_none());
        assert_eq!(session.submit_answer(0), StepOutcome::Question(1));
        assert!(session.result().is_none());
        assert_eq!(session.submit_answer(0), StepOutcome::Finished);
        assert!(session.result().is_some());
    }

    #[test]
    fn test_out_of_range_answer_contributes_nothing() {
        let quiz = type_quiz();
        let mut session = QuizSession::new(&quiz);
        session.submit_answer(99);
        session.submit_answer(99);
        assert_eq!(session.scores(), &[0; SCORE_TAGS.len()]);
        // All-zero scores still resolve deterministically to tag A.
        assert_eq!(session.result().unwrap().title, "Type A");
    }

    #[test]
    fn test_coerce_points_handles_junk() {
        assert_eq!(coerce_points(&json!(3)), 3);
        assert_eq!(coerce_points(&json!(2.9)), 2);
        assert_eq!(coerce_points(&json!("4")), 4);
        assert_eq!(coerce_points(&json!("x")), 0);
        assert_eq!(coerce_points(&json!(null)), 0);
        assert_eq!(coerce_points(&json!([1])), 0);
    }
}
