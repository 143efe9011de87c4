pub mod actor;
pub mod events;
pub mod factor;
pub mod state;

pub use actor::{PanelActor, PanelActorBuilder, PanelMessage};
pub use events::{EventSender, PanelEvent};
pub use factor::Factor;
pub use state::{FlowState, IgnoreReason, PanelState};
