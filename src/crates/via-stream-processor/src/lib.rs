//! Normalizes the agent's internal event stream into the wire-format event
//! sequence clients consume over the chat-streaming endpoint (spec.md
//! §4.11).

pub mod events;
pub mod processor;
pub mod wire;

pub use events::WireEvent;
pub use processor::{process_stream, StreamProcessorConfig};
pub use wire::{to_wire_value, to_wire_value_display};
