//! USB MIDI output for encoder control changes.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::midi::MidiClass;
use embassy_usb::Builder;
use pad_core::{ControlChange, OutputError};

type UsbDriver = Driver<'static, USB>;

/// USB-MIDI endpoint size.
const MIDI_PACKET_SIZE: u16 = 64;

/// Writes control changes as USB-MIDI event packets on cable 0.
pub struct MidiOutput {
    class: MidiClass<'static, UsbDriver>,
}

impl MidiOutput {
    #[must_use]
    pub fn new(class: MidiClass<'static, UsbDriver>) -> Self {
        Self { class }
    }

    /// Wait until the host opens the MIDI interface.
    pub async fn wait_connection(&mut self) {
        self.class.wait_connection().await;
    }

    /// Send one control change.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Io`] if the endpoint rejects the write.
    pub async fn send(&mut self, cc: ControlChange) -> Result<(), OutputError> {
        self.class
            .write_packet(&cc.to_usb_packet())
            .await
            .map_err(|_| OutputError::Io)
    }
}

/// Add a MIDI streaming interface (one jack each way) to the builder.
pub fn configure_midi(builder: &mut Builder<'static, UsbDriver>) -> MidiOutput {
    MidiOutput::new(MidiClass::new(builder, 1, 1, MIDI_PACKET_SIZE))
}
