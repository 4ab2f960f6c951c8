//! Raw HID LED and event firmware for the loop pad and work board.
//!
//! This crate is the RP2040 side of the raw HID protocol implemented in
//! [`pad_core`]: it wires the USB endpoints, the WS2812 strip and the
//! key/encoder pins to the shared [`PadState`].
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with these tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Host Task**: Reads raw HID reports and applies them through [`HostLink`]
//! - **HID TX Task**: Drains the outbound queue into the raw HID IN endpoint
//! - **Event Task**: Turns key and encoder activity into event packets
//! - **Render Task**: Paints the LED strip from the shared state every frame
//! - **Key / Encoder Tasks**: One per switch or encoder, feeding the event task
//! - **MIDI Task** (`midi`): Writes encoder control changes to USB MIDI
//!
//! Device → host traffic goes through one bounded [`Channel`](embassy_sync::channel::Channel).
//! Producers never wait on it: a full queue drops the packet.
//!
//! # Modules
//!
//! - [`board`]: Compile-time board selection ([`board::PROFILE`])
//! - [`shared`]: Shared state and the outbound queue ([`SharedState`], [`QueueSink`])
//! - [`usb_hid`]: Raw HID interface ([`RawHidSource`], [`RawHidSink`])
//! - [`leds`]: WS2812 output ([`LedStrip`])
//! - [`keys`]: Key switches and rotary encoders ([`KeySwitch`], [`RotaryEncoder`])
//! - [`usb_midi`]: USB MIDI output ([`MidiOutput`], `midi` feature)
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`board-loop`** (default): 3×3 loop pad
//! - **`board-work`**: 48-key work board
//! - **`midi`** (default): Encoder detents also go out as USB MIDI control changes

#![no_std]

// Ensure exactly one board is selected
#[cfg(all(feature = "board-loop", feature = "board-work"))]
compile_error!("Cannot enable both `board-loop` and `board-work` features - they describe different hardware");

#[cfg(not(any(feature = "board-loop", feature = "board-work")))]
compile_error!("Enable one of the `board-loop` or `board-work` features");

// Re-export core types for convenience
pub use pad_core::{
    Applied, CommandError, CommandSource, EventEncoder, HostLink, InputError, LinkError,
    OutputError, PacketSink, PadState, Profile, StateCell,
};
pub use pad_proto::{Packet, Rgb, PACKET_SIZE};

pub mod board;
pub mod keys;
pub mod leds;
pub mod shared;
pub mod usb_hid;
#[cfg(feature = "midi")]
pub mod usb_midi;

pub use keys::{InputEvent, KeySwitch, RotaryEncoder};
pub use leds::LedStrip;
pub use shared::{QueueSink, SharedState};
pub use usb_hid::{configure_raw_hid, RawHidSink, RawHidSource};
#[cfg(feature = "midi")]
pub use usb_midi::{configure_midi, MidiOutput};
