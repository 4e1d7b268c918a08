pub mod app_config;
pub mod camera;
pub mod camera_config;
pub mod cli;
pub mod common;
pub mod config_loader;
pub mod core;
pub mod errors;
pub mod imaging;
pub mod operations;
pub mod soap;

pub use errors::{ImagingError, TransportError};
pub use imaging::{ImagingCommand, ImagingService};
pub use soap::session::SessionContext;
pub use soap::transport::{SoapResponse, SoapTransport};
