// Planning module: dataset and the MIP formulation built from it

pub mod constraints;
pub mod dataset;
pub mod error;
pub mod formulation;
pub mod index;
pub mod loader;
pub mod objective;
pub mod variables;

#[cfg(test)]
pub(crate) mod testing;

pub use constraints::{ConstraintBuilder, ConstraintCounts};
pub use dataset::*;
pub use error::ConfigError;
pub use formulation::Formulation;
pub use index::{BalanceKey, FirstStageKey, IndexSets, RecourseKey};
pub use loader::{load_from_path, load_from_str, LoadedDocument};
pub use variables::DecisionVariables;
