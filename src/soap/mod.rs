pub mod envelope;
pub mod http_transport;
pub mod session;
pub mod transport;
pub mod xml_scan;
