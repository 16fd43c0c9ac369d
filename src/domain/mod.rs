// Domain layer: tables, models and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod tables;
pub mod tarot;
