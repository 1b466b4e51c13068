// Typed errors for user-driven dashboard controls
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("Unknown scope '{0}' (expected minutes or 'all')")]
    UnknownScope(String),

    #[error("Scope '{0}' is not one of the offered options")]
    ScopeNotOffered(String),

    #[error("Unknown chart channel '{0}'")]
    UnknownChannel(String),

    #[error("Unknown axis mode '{0}'")]
    UnknownAxisMode(String),

    #[error("Invalid {axis} range [{min}, {max}]")]
    InvalidRange { axis: &'static str, min: f64, max: f64 },

    #[error("Zoom event reports neither an x nor a y range")]
    EmptyZoom,
}
