//! Interactive QC session state.
//!
//! The session owns the live table and is the only layer that emits events;
//! the reconciliation functions it calls stay pure transformations.

pub mod error;
pub mod events;
pub mod selection;
pub mod session;

pub use error::{Result, SessionError};
pub use events::{EventQueue, SessionEvent};
pub use selection::{SelectedValue, Selection, SelectionState, SourceId};
pub use session::Session;
