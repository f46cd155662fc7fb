pub mod clock;
pub mod configuration;
pub mod domain;
pub mod messaging;
pub mod routes;
pub mod startup;
pub mod telemetry;
