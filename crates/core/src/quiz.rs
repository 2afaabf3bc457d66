//! Gem personality quiz.
//!
//! Three fixed questions, each with four options tagged by an outcome gem.
//! The quiz is a small state machine: `Question(0) → … → Question(N-1) →
//! Result(gem)`. Nothing here is persisted; the storefront keeps a
//! [`QuizState`] in the visitor's session and drops it on navigation.

use serde::{Deserialize, Serialize};

/// Outcome categories, in registration order.
///
/// Registration order only matters for the tie rule in [`Tally::winner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gem {
    Emerald,
    Diamond,
    Sapphire,
    Ruby,
}

impl Gem {
    /// Display name shown on the result card.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Emerald => "Emerald",
            Self::Diamond => "Diamond",
            Self::Sapphire => "Sapphire",
            Self::Ruby => "Ruby",
        }
    }

    /// Personality blurb shown under the result.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Emerald => {
                "Bold, mysterious, and full of life. You're drawn to nature's beauty and aren't afraid to stand out."
            }
            Self::Diamond => {
                "Timeless, loyal, and elegant. You appreciate classics and value authenticity above all."
            }
            Self::Sapphire => {
                "Serene, wise, and deeply thoughtful. You bring calm and clarity wherever you go."
            }
            Self::Ruby => {
                "Passionate, warm, and full of energy. You live life with intensity and genuine emotion."
            }
        }
    }

    /// Stylesheet class for the result swatch.
    #[must_use]
    pub const fn swatch_class(self) -> &'static str {
        match self {
            Self::Emerald => "swatch-emerald",
            Self::Diamond => "swatch-diamond",
            Self::Sapphire => "swatch-sapphire",
            Self::Ruby => "swatch-ruby",
        }
    }
}

/// One selectable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOption {
    pub text: &'static str,
    pub gem: Gem,
}

/// A quiz question with its four options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [QuizOption; 4],
}

const fn option(text: &'static str, gem: Gem) -> QuizOption {
    QuizOption { text, gem }
}

/// The fixed question set.
pub const QUESTIONS: [Question; 3] = [
    Question {
        prompt: "How would you describe your ideal weekend?",
        options: [
            option("Adventure in nature", Gem::Emerald),
            option("Elegant dinner party", Gem::Diamond),
            option("Creative artistic project", Gem::Sapphire),
            option("Cozy intimate gathering", Gem::Ruby),
        ],
    },
    Question {
        prompt: "Which word resonates most with you?",
        options: [
            option("Mysterious", Gem::Emerald),
            option("Timeless", Gem::Diamond),
            option("Serene", Gem::Sapphire),
            option("Passionate", Gem::Ruby),
        ],
    },
    Question {
        prompt: "Your style philosophy is:",
        options: [
            option("Bold and unconventional", Gem::Emerald),
            option("Classic and refined", Gem::Diamond),
            option("Calm and sophisticated", Gem::Sapphire),
            option("Warm and expressive", Gem::Ruby),
        ],
    },
];

/// Ordered frequency count of selected gems.
///
/// Entries keep the order in which each gem was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(Gem, usize)>,
}

impl Tally {
    /// Count the answers, registering each gem on first sight.
    #[must_use]
    pub fn from_answers(answers: &[Gem]) -> Self {
        let mut tally = Self::default();
        for gem in answers {
            tally.record(*gem);
        }
        tally
    }

    fn record(&mut self, gem: Gem) {
        match self.entries.iter_mut().find(|(g, _)| *g == gem) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((gem, 1)),
        }
    }

    /// Count for a single gem.
    #[must_use]
    pub fn count(&self, gem: Gem) -> usize {
        self.entries
            .iter()
            .find(|(g, _)| *g == gem)
            .map_or(0, |(_, count)| *count)
    }

    /// Gem with the highest count.
    ///
    /// Ties go to the tied gem that was registered first, i.e. the one that
    /// appeared earliest in the answers. `None` only for an empty tally.
    #[must_use]
    pub fn winner(&self) -> Option<Gem> {
        let mut best: Option<(Gem, usize)> = None;
        for &(gem, count) in &self.entries {
            // strict comparison keeps the earlier entry on ties
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((gem, count));
            }
        }
        best.map(|(gem, _)| gem)
    }
}

/// Errors from driving the quiz.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The posted option index does not exist on the current question.
    #[error("option {0} is out of range")]
    OptionOutOfRange(usize),
    /// An answer arrived after the result was computed.
    #[error("quiz is already finished")]
    Finished,
}

/// Where the visitor is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStage {
    /// Showing the question at this index.
    Question(usize),
    /// Terminal state with the computed gem.
    Result(Gem),
}

/// Progress through the quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    answers: Vec<Gem>,
    result: Option<Gem>,
}

impl QuizState {
    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> QuizStage {
        self.result
            .map_or(QuizStage::Question(self.answers.len()), QuizStage::Result)
    }

    /// Answers given so far.
    #[must_use]
    pub fn answers(&self) -> &[Gem] {
        &self.answers
    }

    /// Select option `index` on the current question.
    ///
    /// Appends its gem and advances; on the last question the result is
    /// computed instead.
    ///
    /// # Errors
    ///
    /// [`QuizError::Finished`] if the result is already shown,
    /// [`QuizError::OptionOutOfRange`] for an index past the options.
    pub fn answer(&mut self, index: usize) -> Result<QuizStage, QuizError> {
        let QuizStage::Question(current) = self.stage() else {
            return Err(QuizError::Finished);
        };
        let question = QUESTIONS.get(current).ok_or(QuizError::Finished)?;
        let option = question
            .options
            .get(index)
            .ok_or(QuizError::OptionOutOfRange(index))?;

        self.answers.push(option.gem);
        if self.answers.len() == QUESTIONS.len() {
            self.result = Tally::from_answers(&self.answers).winner();
        }
        Ok(self.stage())
    }

    /// Return to the first question, discarding every answer.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.result = None;
    }
}

/// Progress bar width for the question at `index`, in whole percent.
#[must_use]
pub fn progress_percent(index: usize) -> usize {
    ((index + 1) * 100) / QUESTIONS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(question: usize, gem: Gem) -> usize {
        QUESTIONS[question]
            .options
            .iter()
            .position(|o| o.gem == gem)
            .expect("every question offers every gem")
    }

    fn play(gems: [Gem; 3]) -> QuizStage {
        let mut state = QuizState::default();
        let mut stage = state.stage();
        for (question, gem) in gems.into_iter().enumerate() {
            stage = state.answer(index_of(question, gem)).expect("valid answer");
        }
        stage
    }

    #[test]
    fn test_majority_wins() {
        let stage = play([Gem::Emerald, Gem::Emerald, Gem::Diamond]);
        assert_eq!(stage, QuizStage::Result(Gem::Emerald));
        assert_eq!(Gem::Emerald.name(), "Emerald");
    }

    #[test]
    fn test_majority_does_not_need_to_come_first() {
        let stage = play([Gem::Ruby, Gem::Sapphire, Gem::Sapphire]);
        assert_eq!(stage, QuizStage::Result(Gem::Sapphire));
    }

    #[test]
    fn test_full_tie_goes_to_first_registered() {
        assert_eq!(
            play([Gem::Ruby, Gem::Diamond, Gem::Sapphire]),
            QuizStage::Result(Gem::Ruby)
        );
        assert_eq!(
            play([Gem::Sapphire, Gem::Ruby, Gem::Emerald]),
            QuizStage::Result(Gem::Sapphire)
        );
    }

    #[test]
    fn test_tally_counts_in_first_seen_order() {
        let tally = Tally::from_answers(&[Gem::Diamond, Gem::Ruby, Gem::Diamond]);
        assert_eq!(tally.count(Gem::Diamond), 2);
        assert_eq!(tally.count(Gem::Ruby), 1);
        assert_eq!(tally.count(Gem::Emerald), 0);
        assert_eq!(tally.winner(), Some(Gem::Diamond));
    }

    #[test]
    fn test_empty_tally_has_no_winner() {
        assert_eq!(Tally::default().winner(), None);
    }

    #[test]
    fn test_answer_advances_question_index() {
        let mut state = QuizState::default();
        assert_eq!(state.stage(), QuizStage::Question(0));
        assert_eq!(state.answer(1), Ok(QuizStage::Question(1)));
        assert_eq!(state.answers(), &[Gem::Diamond]);
    }

    #[test]
    fn test_out_of_range_option_leaves_state_untouched() {
        let mut state = QuizState::default();
        assert_eq!(state.answer(4), Err(QuizError::OptionOutOfRange(4)));
        assert_eq!(state, QuizState::default());
    }

    #[test]
    fn test_answer_after_result_is_rejected() {
        let mut state = QuizState::default();
        for _ in 0..QUESTIONS.len() {
            state.answer(0).expect("valid answer");
        }
        assert_eq!(state.answer(0), Err(QuizError::Finished));
    }

    #[test]
    fn test_reset_discards_answers() {
        let mut state = QuizState::default();
        state.answer(0).expect("valid answer");
        state.answer(0).expect("valid answer");
        state.reset();
        assert_eq!(state.stage(), QuizStage::Question(0));
        assert!(state.answers().is_empty());
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0), 33);
        assert_eq!(progress_percent(2), 100);
    }
}
