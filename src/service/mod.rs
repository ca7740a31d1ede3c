mod errors;
pub mod events;
mod service;
mod service_builder;

pub use errors::Error;
pub use events::{Event, NoopPublisher, Publisher};
pub use service::{Service, run};
pub use service_builder::{DEFAULT_LOG_INTERVAL, ServiceBuilder};
