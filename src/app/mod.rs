// Application-facing seams; implementations live in `infra`

pub mod ports;
