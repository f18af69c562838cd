//! RCON client for sending console commands to a remote game server.
//!
//! The wire format is the Source RCON packet framing (little-endian length,
//! request id, type, NUL-terminated body). [`RconSession`] owns one
//! authenticated TCP connection; [`CommandChannel`] is the narrow seam the
//! search engine talks through, so it can run against a synthetic world in
//! tests.

pub mod codec;

mod channel;
mod error;
mod session;
mod settings;

pub use channel::CommandChannel;
pub use codec::{Packet, PacketKind};
pub use error::RconError;
pub use session::RconSession;
pub use settings::RconSettings;
