/// WebRTC session description carried as the negotiation payload at the HTTP boundary.
///
/// Serialized as `{"type": "offer", "sdp": "v=0..."}`, the same shape browsers produce.
pub use webrtc::peer_connection::sdp::session_description::RTCSessionDescription as SessionDescription;
pub use webrtc::peer_connection::sdp::sdp_type::RTCSdpType as SdpType;
