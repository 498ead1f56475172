// Domain layer: models and ports. Adapters implement the ports, app pipelines consume them.

pub mod model;
pub mod ports;
