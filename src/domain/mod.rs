// Domain layer: core models and ports (interfaces). No external dependencies beyond std/serde/chrono.

pub mod document;
pub mod model;
pub mod ports;
