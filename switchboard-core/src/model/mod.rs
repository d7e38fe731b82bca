mod correlation;
mod envelope;
mod peer;
mod session;

pub use correlation::CorrelationId;
pub use envelope::{Envelope, EnvelopeError};
pub use peer::PeerId;
pub use session::{SdpType, SessionDescription};
