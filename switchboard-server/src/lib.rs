mod actor;
mod error;
mod registry;
mod signaling;
mod transport;

pub use actor::*;
pub use error::*;
pub use registry::*;
pub use signaling::*;
pub use transport::*;
