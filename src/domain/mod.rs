// Domain layer: immutable value types and the ports they are read through.

pub mod date;
pub mod period;
pub mod ports;
pub mod time;
pub mod timestamp;
pub mod zone;
