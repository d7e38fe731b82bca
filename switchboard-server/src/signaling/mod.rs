mod app_state;
mod http_handlers;
mod router;
mod ws_handler;

pub use app_state::*;
pub use http_handlers::*;
pub use router::*;
pub use ws_handler::*;
