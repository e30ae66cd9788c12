//! Domain-level structures: labels, predictions, model state and the response envelope.

pub mod labels;
pub mod prediction;
pub mod response;

pub use labels::{AnimalLabels, capitalize};
pub use prediction::{ModelState, Prediction};
pub use response::{ModelInfo, ResponseEnvelope};
