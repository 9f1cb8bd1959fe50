//! Domain model (ids, targets, policy, outcomes, decisions, state, history).

pub mod attempt;
pub mod decision;
pub mod ids;
pub mod outcome;
pub mod policy;
pub mod state;
pub mod target;

pub use attempt::AttemptRecord;
pub use decision::{Decider, Decision, DefaultDecider};
pub use ids::{RunId, TargetId};
pub use outcome::{AttemptError, FailureClass, OutcomeKind};
pub use policy::{Policy, PolicyError};
pub use state::GrabberStatus;
pub use target::{Account, Target};
