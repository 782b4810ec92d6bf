mod hub_error;
mod transport_error;

pub use hub_error::{ErrorKind, HubError};
pub use transport_error::TransportError;
