// Domain layer: villa models and the ports the booking core talks through.

pub mod model;
pub mod ports;
