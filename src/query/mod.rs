pub mod collector;
pub mod evaluator;
pub mod matcher;
pub mod value;

pub use collector::{collect, filter_records, QueryOutcome};
pub use evaluator::{QueryEvaluator, QueryWarning};
pub use matcher::{evaluate_term, exists, resolve};
pub use value::{AndGroup, Mode, OrTerm, Query, QueryValue};
