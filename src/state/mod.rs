// UI state machine - everything the screen shows, without the screen
//
// Controllers never touch the terminal. They build lists of `UiCommand`s
// which the TUI applies to the single `UiState`; network work happens in
// async helpers whose output is again a list of commands. That keeps every
// transition testable with plain values.
//
// - panels:       UiState, UiCommand and the result/error panel helpers
// - tabs:         tab activation by explicit identifier
// - operation:    validate -> request -> result flow shared by all operations
// - connectivity: service reachability and network link transitions
// - clipboard:    copy with fallback and transient acknowledgement

pub mod clipboard;
pub mod connectivity;
pub mod operation;
pub mod panels;
pub mod tabs;

#[cfg(test)]
pub(crate) mod testing;

pub use clipboard::{ClipboardCopier, CopyOutcome, CopySource};
pub use connectivity::{ConnectivityMonitor, NetworkEvent, Probe};
pub use operation::{Decrypt, Encrypt, GenerateKey, ResultFields, Submission};
pub use panels::{PanelId, UiCommand, UiState};
pub use tabs::Tab;
