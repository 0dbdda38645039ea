// Domain layer: wire records and ports. No HTTP here.

pub mod model;
pub mod ports;
