pub mod controller;
pub mod events;
pub mod session;

pub use controller::{EditorController, EditorMode, LoadOutcome, SaveOutcome, SessionState};
pub use events::EditorEvent;
pub use session::{SessionHandle, SessionTicket};
