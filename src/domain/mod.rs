// Domain layer: core models and ports (interfaces). No external dependencies
// beyond std, async-trait and the error type.

pub mod model;
pub mod ports;
