mod frame_transport;
mod memory_transport;
mod ws_transport;

pub use frame_transport::*;
pub use memory_transport::*;
pub use ws_transport::*;
