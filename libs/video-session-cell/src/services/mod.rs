pub mod room;
pub mod session;

pub use room::{VideoRoomService, VIDEO_ROOM_PATH};
pub use session::{Liveness, SessionController};
