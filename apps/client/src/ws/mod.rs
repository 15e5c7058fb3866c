pub mod channel;
pub mod machine;
pub mod protocol;
pub mod transport;

pub use channel::{ChannelListener, RoomChannel, RoomController, RoomIdentity};
pub use machine::ConnectionStatus;
pub use protocol::{ClientMsg, Inbound, ServerEvent};
pub use transport::{Transport, TransportFrame, TransportLink, WebSocketTransport};
