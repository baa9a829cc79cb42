// Domain layer: OS model and the client port. No process or network code here.

pub mod model;
pub mod ports;
