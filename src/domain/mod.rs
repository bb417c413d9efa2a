// Domain layer: ticket/face models and the I/O ports the engine depends on.

pub mod model;
pub mod ports;
