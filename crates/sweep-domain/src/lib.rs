pub mod config;
pub mod error;
pub mod expand;
pub mod issue;
pub mod outcome;
pub mod request;

pub use config::{FieldCheck, SweepConfig, validate_query, validate_transition_name};
pub use error::DomainError;
pub use expand::expand;
pub use issue::{IssueKey, IssueRef, Transition};
pub use outcome::{BatchResult, IssueFailure, OutcomeRecord};
pub use request::{SearchQuery, TransitionRequest, fix_empty_and_trim};
