use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
#[cfg(feature = "cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend.
    ///
    /// Fails with [`SolverError::SolverNotAvailable`] when the backend was
    /// not compiled in.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            SolverBackend::Highs => Self::highs(),
            SolverBackend::CoinCbc => Self::coin_cbc(),
        }
    }

    /// The preferred compiled-in solver: HiGHS, then CBC.
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::highs().or_else(|_| Self::coin_cbc())
    }

    #[cfg(feature = "highs")]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(HighsSolver::new()))
    }

    #[cfg(not(feature = "highs"))]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(
            "HiGHS support was not compiled in (enable the `highs` feature)".into(),
        ))
    }

    #[cfg(feature = "cbc")]
    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(CoinCbcSolver::new()))
    }

    #[cfg(not(feature = "cbc"))]
    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(
            "COIN-OR CBC support was not compiled in (enable the `cbc` feature)".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "highs")]
    #[test]
    fn auto_prefers_highs() {
        let solver = SolverFactory::create_from_backend(SolverBackend::Auto).unwrap();
        assert_eq!(solver.name(), "HiGHS");
    }

    #[cfg(not(feature = "cbc"))]
    #[test]
    fn missing_backend_is_reported() {
        let err = SolverFactory::create_from_backend(SolverBackend::CoinCbc)
            .err()
            .unwrap();
        assert!(matches!(err, SolverError::SolverNotAvailable(_)));
    }
}
