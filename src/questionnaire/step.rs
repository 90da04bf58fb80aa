//! Wizard step identifiers.

use serde::Serialize;
use strum::{Display, EnumIter};

/// Number of question steps before the results.
pub const TOTAL_QUESTION_STEPS: u8 = 4;

/// One screen of the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize)]
#[derive(Display, EnumIter)]
pub enum WizardStep {
    #[default]
    #[strum(serialize = "Category")]
    Category,
    #[strum(serialize = "Software")]
    Software,
    #[strum(serialize = "Features & Ports")]
    Features,
    #[strum(serialize = "Budget")]
    Budget,
    #[strum(serialize = "Results")]
    Results,
    #[strum(serialize = "Comparison")]
    Comparison,
    #[strum(serialize = "Details")]
    Details,
}

impl WizardStep {
    /// 1-based step number.
    pub fn number(&self) -> u8 {
        match self {
            Self::Category => 1,
            Self::Software => 2,
            Self::Features => 3,
            Self::Budget => 4,
            Self::Results => 5,
            Self::Comparison => 6,
            Self::Details => 7,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Category),
            2 => Some(Self::Software),
            3 => Some(Self::Features),
            4 => Some(Self::Budget),
            5 => Some(Self::Results),
            6 => Some(Self::Comparison),
            7 => Some(Self::Details),
            _ => None,
        }
    }

    /// Whether this step asks the user something.
    pub fn is_question(&self) -> bool {
        self.number() <= TOTAL_QUESTION_STEPS
    }

    /// The following question step; `None` past the budget step.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Category => Some(Self::Software),
            Self::Software => Some(Self::Features),
            Self::Features => Some(Self::Budget),
            Self::Budget => Some(Self::Results),
            Self::Results | Self::Comparison | Self::Details => None,
        }
    }

    /// Step reached by going back. Comparison and details return to results.
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Category => None,
            Self::Software => Some(Self::Category),
            Self::Features => Some(Self::Software),
            Self::Budget => Some(Self::Features),
            Self::Results => Some(Self::Budget),
            Self::Comparison | Self::Details => Some(Self::Results),
        }
    }

    /// Heading shown above the step.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Category => "What will you mostly use the laptop for?",
            Self::Software => "Which programs do you need to run?",
            Self::Features => "Which features and ports matter to you?",
            Self::Budget => "What is your budget?",
            Self::Results => "Recommended laptops",
            Self::Comparison => "Compare laptops",
            Self::Details => "Laptop details",
        }
    }
}
