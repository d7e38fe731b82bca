mod actor_config;
mod actor_runner;
mod dispatcher;
mod peer_actor;

pub use actor_config::*;
pub use actor_runner::*;
pub use peer_actor::*;
