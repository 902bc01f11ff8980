use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("mass must be finite and greater than zero, got {0}")]
    InvalidMass(f64),
    #[error("angular damping must lie in [0, 1], got {0}")]
    InvalidDamping(f64),
    #[error("invalid body shape: {0}")]
    InvalidShape(&'static str),
    #[error("timestep must be finite and non-negative, got {0}")]
    InvalidTimestep(f64),
}
