use anyhow::Result;
use switchboard_core::SessionDescription;

pub const OFFER_SDP: &str = "v=0\r\no=- 4215775240449105457 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n";
pub const ANSWER_SDP: &str = "v=0\r\no=- 1929366591278427117 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n";

pub fn offer() -> SessionDescription {
    session_description("offer", OFFER_SDP)
}

pub fn answer() -> SessionDescription {
    session_description("answer", ANSWER_SDP)
}

fn session_description(kind: &str, sdp: &str) -> SessionDescription {
    serde_json::from_value(serde_json::json!({ "type": kind, "sdp": sdp }))
        .expect("valid session description")
}

pub fn answer_bytes() -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&answer())?)
}
