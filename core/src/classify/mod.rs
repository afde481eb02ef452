pub mod client;
pub mod outcome;

pub use client::{Classifier, HttpClassifier, SUCCESS_CODES};
pub use outcome::{ApiVerdict, ExchangeOutcome, IndeterminateCause, Reply};
