//! Key switches and rotary encoders.
//!
//! Both are written against the `embedded-hal` digital traits, so any
//! async-capable input pin works. Switches are active low with pull-ups.

use embassy_time::{Duration, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;
use pad_core::InputError;

/// Settle time after an edge before the level is sampled.
pub const DEBOUNCE: Duration = Duration::from_millis(5);

/// Local input activity, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum InputEvent {
    /// A key switch changed state.
    Key { index: u8, pressed: bool },
    /// An encoder's push switch changed state.
    EncoderSwitch { index: u8, pressed: bool },
    /// One encoder detent.
    EncoderTurn { index: u8, clockwise: bool },
}

/// Which event a [`KeySwitch`] reports as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SwitchKind {
    Key(u8),
    EncoderSwitch(u8),
}

impl SwitchKind {
    #[must_use]
    pub const fn event(self, pressed: bool) -> InputEvent {
        match self {
            Self::Key(index) => InputEvent::Key { index, pressed },
            Self::EncoderSwitch(index) => InputEvent::EncoderSwitch { index, pressed },
        }
    }
}

/// A debounced, active-low push switch.
pub struct KeySwitch<P> {
    pin: P,
    pressed: bool,
}

impl<P: InputPin + Wait> KeySwitch<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            pressed: false,
        }
    }

    /// Wait for the next settled transition and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Io`] if the pin reports an error.
    pub async fn changed(&mut self) -> Result<bool, InputError> {
        loop {
            self.pin
                .wait_for_any_edge()
                .await
                .map_err(|_| InputError::Io)?;
            Timer::after(DEBOUNCE).await;
            let pressed = self.pin.is_low().map_err(|_| InputError::Io)?;
            if pressed != self.pressed {
                self.pressed = pressed;
                return Ok(pressed);
            }
        }
    }
}

/// A two-phase mechanical encoder, one event per detent.
///
/// A falling edge on A marks a detent; the level of B at that moment gives
/// the direction.
pub struct RotaryEncoder<A, B> {
    a: A,
    b: B,
}

impl<A: InputPin + Wait, B: InputPin> RotaryEncoder<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// Wait for the next detent. Returns `true` for clockwise.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Io`] if either pin reports an error.
    pub async fn detent(&mut self) -> Result<bool, InputError> {
        self.a
            .wait_for_falling_edge()
            .await
            .map_err(|_| InputError::Io)?;
        self.b.is_high().map_err(|_| InputError::Io)
    }
}
