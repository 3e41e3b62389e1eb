//! Business logic services.

pub mod poll;
pub mod survey;

pub use poll::{PollService, Toggle};
pub use survey::SurveyService;
