//! Questionnaire state machine
//!
//! - [`WizardStep`] - the seven screens of the flow
//! - [`Selections`] - typed answers, one slot per question step
//! - [`QuestionnaireState`] - pure transitions returning the next state
//! - [`QuestionnaireController`] - state plus the data fetched for it

mod controller;
mod selection;
mod state;
mod step;

pub use controller::{ProgramItem, QuestionnaireController};
pub use selection::{SelectionKind, Selections, SubKey};
pub use state::{Direction, MIN_COMPARE, QuestionnaireState, Refresh};
pub use step::{TOTAL_QUESTION_STEPS, WizardStep};
