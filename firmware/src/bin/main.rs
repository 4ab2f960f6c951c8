#![no_std]
#![no_main]

use defmt::{error, info, trace, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{PIO0, USB};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use loop_pad_firmware::board::{self, ENCODER_COUNT, LED_COUNT, SWITCH_COUNT};
use loop_pad_firmware::keys::SwitchKind;
use loop_pad_firmware::shared::{dropped_packets, OutboundQueue};
use loop_pad_firmware::{
    configure_raw_hid, EventEncoder, HostLink, InputEvent, KeySwitch, LedStrip, Packet,
    PacketSink, QueueSink, RawHidSink, RawHidSource, RotaryEncoder, SharedState, StateCell,
};
use pad_core::encoder_cc;
use static_cell::StaticCell;

#[cfg(feature = "midi")]
use loop_pad_firmware::{configure_midi, MidiOutput};
#[cfg(feature = "midi")]
use pad_core::ControlChange;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

/// LED refresh period (~60 Hz).
const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Protocol state shared by the host, event and render tasks.
static STATE: SharedState<LED_COUNT> = SharedState::new(&board::PROFILE);

/// Device -> host packets. Lossy: producers never wait.
static OUTBOUND: OutboundQueue = Channel::new();

/// Key and encoder activity for the event task.
static EVENTS: Channel<CriticalSectionRawMutex, InputEvent, 16> = Channel::new();

/// Encoder control changes for the MIDI task.
#[cfg(feature = "midi")]
static MIDI_QUEUE: Channel<CriticalSectionRawMutex, ControlChange, 8> = Channel::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("{} pad starting...", board::PROFILE.name);

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Loop Pad");
    usb_config.product = Some("Loop Pad Raw HID");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Configure raw HID class
    let hid_state = HID_STATE.init(State::new());
    let (hid_source, hid_sink) = configure_raw_hid(&mut builder, hid_state);

    #[cfg(feature = "midi")]
    let midi = configure_midi(&mut builder);

    // Build the USB device
    let usb_device = builder.build();

    // --- LED Setup ---
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let strip = LedStrip::new(PioWs2812::new(
        &mut common,
        sm0,
        p.DMA_CH0,
        p.PIN_22,
        &program,
    ));

    // --- Key / Encoder Setup ---
    #[cfg(feature = "board-loop")]
    let keys = [
        Input::new(p.PIN_0, Pull::Up),
        Input::new(p.PIN_1, Pull::Up),
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
    ];
    #[cfg(feature = "board-loop")]
    let encoder_switches = [
        Input::new(p.PIN_9, Pull::Up),
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
    ];
    #[cfg(feature = "board-loop")]
    let encoders = [
        RotaryEncoder::new(Input::new(p.PIN_12, Pull::Up), Input::new(p.PIN_13, Pull::Up)),
        RotaryEncoder::new(Input::new(p.PIN_14, Pull::Up), Input::new(p.PIN_15, Pull::Up)),
        RotaryEncoder::new(Input::new(p.PIN_16, Pull::Up), Input::new(p.PIN_17, Pull::Up)),
    ];

    // The work board's key matrix is scanned elsewhere; only its encoder is wired here.
    #[cfg(all(feature = "board-work", not(feature = "board-loop")))]
    let keys: [Input<'static>; 0] = [];
    #[cfg(all(feature = "board-work", not(feature = "board-loop")))]
    let encoder_switches = [Input::new(p.PIN_9, Pull::Up)];
    #[cfg(all(feature = "board-work", not(feature = "board-loop")))]
    let encoders = [RotaryEncoder::new(
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
    )];

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(hid_tx_task(hid_sink).unwrap());
    spawner.spawn(event_task().unwrap());
    spawner.spawn(host_task(HostLink::new(hid_source, QueueSink::new(&OUTBOUND))).unwrap());
    spawner.spawn(render_task(strip).unwrap());

    for (i, pin) in keys.into_iter().enumerate() {
        spawner.spawn(switch_task(SwitchKind::Key(i as u8), KeySwitch::new(pin)).unwrap());
    }
    for (i, pin) in encoder_switches.into_iter().enumerate() {
        spawner.spawn(
            switch_task(SwitchKind::EncoderSwitch(i as u8), KeySwitch::new(pin)).unwrap(),
        );
    }
    for (i, encoder) in encoders.into_iter().enumerate() {
        spawner.spawn(encoder_task(i as u8, encoder).unwrap());
    }

    #[cfg(feature = "midi")]
    spawner.spawn(midi_task(midi).unwrap());

    info!("{} pad initialized, waiting for host...", board::PROFILE.name);
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Host task - applies raw HID commands to the shared state.
#[embassy_executor::task]
async fn host_task(mut link: HostLink<RawHidSource, QueueSink>) {
    link.input_mut().wait_ready().await;
    info!("Raw HID OUT ready, serving host commands...");
    link.run(&STATE).await
}

/// HID TX task - drains the outbound queue into the raw HID IN endpoint.
#[embassy_executor::task]
async fn hid_tx_task(mut sink: RawHidSink) {
    // Wait for USB to be ready
    sink.wait_ready().await;
    info!("Raw HID IN ready, forwarding events...");

    loop {
        let packet = OUTBOUND.receive().await;
        if let Err(e) = sink.send(&packet).await {
            error!("HID write error: {:?}", e);
        }
    }
}

/// Queue a packet for the host, logging if the queue is full.
fn enqueue(sink: &QueueSink, packet: Packet) {
    if sink.push(packet).is_err() {
        warn!("Outbound queue full, {} packets dropped", dropped_packets());
    }
}

/// Event task - encodes local input into device -> host packets.
///
/// The hello is queued before anything else so it is always the first
/// packet the host reads.
#[embassy_executor::task]
async fn event_task() {
    let sink = QueueSink::new(&OUTBOUND);
    let mut encoder = EventEncoder::new();

    if let Some(hello) = STATE.with(|s| encoder.hello(s)) {
        enqueue(&sink, hello);
    }

    loop {
        let event = EVENTS.receive().await;
        trace!("Input: {:?}", event);

        let (packet, layer, cc) = STATE.with(|s| match event {
            InputEvent::Key { index, pressed } => {
                (Some(encoder.key(s, index, pressed)), None, None)
            }
            InputEvent::EncoderSwitch { index, pressed } => (
                encoder.encoder_switch(index, pressed),
                encoder.encoder_toggle(s, pressed),
                None,
            ),
            InputEvent::EncoderTurn { index, clockwise } => (
                Some(encoder.rotation(index, clockwise)),
                None,
                encoder_cc(s, index, clockwise),
            ),
        });

        // Click first, then the layer it switched to.
        for packet in [packet, layer].into_iter().flatten() {
            enqueue(&sink, packet);
        }

        #[cfg(feature = "midi")]
        if let Some(cc) = cc {
            if MIDI_QUEUE.try_send(cc).is_err() {
                warn!("MIDI queue full, dropping {:?}", cc);
            }
        }
        #[cfg(not(feature = "midi"))]
        let _ = cc;
    }
}

/// Render task - paints the strip from the shared state at a fixed rate.
#[embassy_executor::task]
async fn render_task(mut strip: LedStrip<'static, PIO0, 0, LED_COUNT>) {
    let mut ticker = Ticker::every(FRAME_PERIOD);
    loop {
        strip.show(&STATE).await;
        ticker.next().await;
    }
}

/// Switch task - one per key or encoder push switch.
#[embassy_executor::task(pool_size = SWITCH_COUNT)]
async fn switch_task(kind: SwitchKind, mut switch: KeySwitch<Input<'static>>) {
    loop {
        match switch.changed().await {
            Ok(pressed) => {
                if EVENTS.try_send(kind.event(pressed)).is_err() {
                    warn!("Input queue full, dropping {:?}", kind);
                }
            }
            Err(e) => error!("Switch {:?} error: {:?}", kind, e),
        }
    }
}

/// Encoder task - one per rotary encoder.
#[embassy_executor::task(pool_size = ENCODER_COUNT)]
async fn encoder_task(index: u8, mut encoder: RotaryEncoder<Input<'static>, Input<'static>>) {
    loop {
        match encoder.detent().await {
            Ok(clockwise) => {
                if EVENTS
                    .try_send(InputEvent::EncoderTurn { index, clockwise })
                    .is_err()
                {
                    warn!("Input queue full, dropping encoder {} detent", index);
                }
            }
            Err(e) => error!("Encoder {} error: {:?}", index, e),
        }
    }
}

/// MIDI task - forwards encoder control changes while the host listens.
#[cfg(feature = "midi")]
#[embassy_executor::task]
async fn midi_task(mut midi: MidiOutput) {
    loop {
        midi.wait_connection().await;
        info!("MIDI connected");
        loop {
            let cc = MIDI_QUEUE.receive().await;
            if let Err(e) = midi.send(cc).await {
                warn!("MIDI write error: {:?}", e);
                break;
            }
        }
    }
}
