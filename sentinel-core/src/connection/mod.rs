//! Connection-level helpers shared by the probe pipeline

mod port_check;

pub use port_check::{PortCheckError, check_port_async};
