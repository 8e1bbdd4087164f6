//! Stage bodies of the workflow state machine.
//!
//! Each stage reads the current [WorkflowState](crate::types::WorkflowState) and returns a
//! [StateUpdate](crate::types::StateUpdate); the workflow applies it. Analyze and Clarify call
//! out to collaborators, Critique and Generate are pure.

mod analyze;
mod clarify;
mod critique;
#[cfg(test)]
mod critique_test;
mod generate;

pub use analyze::analyze;
pub use clarify::{clarify, question_message};
pub use critique::{CritiqueOutput, critique, route_critique, sufficiency_report};
pub use generate::generate;
