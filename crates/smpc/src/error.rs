//! Error types for port access

use thiserror::Error;

/// Out-of-range access to the virtual port table
///
/// Both variants are caller bugs. The panicking accessors on
/// [`PortTable`](crate::ports::PortTable) report them through `panic!`; the
/// `try_*` accessors hand them back instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    #[error("virtual port {port} out of range (capacity {capacity})")]
    PortOutOfRange { port: usize, capacity: usize },

    #[error("peripheral index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },
}

impl PortError {
    pub fn port_out_of_range(port: usize, capacity: usize) -> Self {
        Self::PortOutOfRange { port, capacity }
    }

    pub fn index_out_of_range(index: usize, capacity: usize) -> Self {
        Self::IndexOutOfRange { index, capacity }
    }
}

pub type PortResult<T> = Result<T, PortError>;
