//! Raw HID interface on the vendor usage page QMK hosts look for.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{
    Config as HidConfig, HidBootProtocol, HidReader, HidReaderWriter, HidSubclass, HidWriter,
    ReadError, State,
};
use embassy_usb::Builder;
use pad_core::{CommandSource, InputError, OutputError, PacketSink};
use pad_proto::{Packet, PACKET_SIZE};

type UsbDriver = Driver<'static, USB>;

/// Vendor-defined raw HID report descriptor.
///
/// One 32-byte input report and one 32-byte output report, no report IDs,
/// on usage page `0xFF60` / usage `0x61`.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x06, 0x60, 0xFF, // Usage Page (Vendor Defined 0xFF60)
    0x09, 0x61, // Usage (0x61)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Device -> host ---
    0x09, 0x62, //   Usage (0x62)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x95, PACKET_SIZE as u8, //   Report Count (32)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Host -> device ---
    0x09, 0x63, //   Usage (0x63)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x95, PACKET_SIZE as u8, //   Report Count (32)
    0x75, 0x08, //   Report Size (8)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Convert HID read errors to [`InputError`].
#[inline]
fn read_error_to_input_error(e: ReadError) -> InputError {
    match e {
        ReadError::BufferOverflow => InputError::BufferOverflow,
        ReadError::Disabled => InputError::Disconnected,
        _ => InputError::Io,
    }
}

/// Host → device reports from the raw HID OUT endpoint.
pub struct RawHidSource {
    reader: HidReader<'static, UsbDriver, PACKET_SIZE>,
    connected: bool,
}

impl RawHidSource {
    #[must_use]
    pub fn new(reader: HidReader<'static, UsbDriver, PACKET_SIZE>) -> Self {
        Self {
            reader,
            connected: false,
        }
    }

    /// Wait until the host has configured the interface.
    pub async fn wait_ready(&mut self) {
        self.reader.ready().await;
        self.connected = true;
    }
}

impl CommandSource for RawHidSource {
    async fn receive(&mut self) -> Result<Packet, InputError> {
        let mut buf = [0u8; PACKET_SIZE];
        match self.reader.read(&mut buf).await {
            Ok(n) => {
                self.connected = true;
                Ok(Packet::from_slice(&buf[..n]))
            }
            Err(e) => {
                if matches!(e, ReadError::Disabled) {
                    self.connected = false;
                }
                Err(read_error_to_input_error(e))
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Device → host packets to the raw HID IN endpoint.
pub struct RawHidSink {
    writer: HidWriter<'static, UsbDriver, PACKET_SIZE>,
    ready: bool,
}

impl RawHidSink {
    #[must_use]
    pub fn new(writer: HidWriter<'static, UsbDriver, PACKET_SIZE>) -> Self {
        Self {
            writer,
            ready: false,
        }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }
}

impl PacketSink for RawHidSink {
    async fn send(&mut self, packet: &Packet) -> Result<(), OutputError> {
        self.writer
            .write(packet.as_bytes())
            .await
            .map_err(|_| OutputError::Io)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Configure the raw HID class in the USB builder.
///
/// Returns the OUT side as a [`RawHidSource`] and the IN side as a
/// [`RawHidSink`].
pub fn configure_raw_hid(
    builder: &mut Builder<'static, UsbDriver>,
    state: &'static mut State<'static>,
) -> (RawHidSource, RawHidSink) {
    let config = HidConfig {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: PACKET_SIZE as u16,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };

    let hid = HidReaderWriter::<_, PACKET_SIZE, PACKET_SIZE>::new(builder, state, config);
    let (reader, writer) = hid.split();
    (RawHidSource::new(reader), RawHidSink::new(writer))
}
