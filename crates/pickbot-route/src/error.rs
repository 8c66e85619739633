use pickbot_core::GridError;
use thiserror::Error;

/// Fatal planning errors. No partial route is produced when one occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("layout has no robot start")]
    MissingRobotStart,

    #[error("layout has no packing station")]
    MissingPackingStation,

    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
}
