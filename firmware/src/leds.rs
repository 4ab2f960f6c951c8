//! WS2812 output for the render pass.

use embassy_rp::pio::Instance;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use pad_core::{LedPainter, StateCell};
use pad_proto::Rgb;
use smart_leds::RGB8;

/// Convert a protocol color to the driver's color type.
#[inline]
#[must_use]
pub const fn to_rgb8(color: Rgb) -> RGB8 {
    RGB8 {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// One frame for an `N`-LED strip.
#[derive(Clone, Copy)]
pub struct Frame<const N: usize>(pub [RGB8; N]);

impl<const N: usize> Frame<N> {
    #[must_use]
    pub const fn dark() -> Self {
        Self([RGB8 { r: 0, g: 0, b: 0 }; N])
    }
}

impl<const N: usize> LedPainter for Frame<N> {
    fn set_all(&mut self, color: Rgb) {
        self.0 = [to_rgb8(color); N];
    }

    fn set(&mut self, index: usize, color: Rgb) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = to_rgb8(color);
        }
    }
}

/// A WS2812 strip driven from PIO state machine `S`.
pub struct LedStrip<'d, P: Instance, const S: usize, const N: usize> {
    driver: PioWs2812<'d, P, S, N>,
    frame: Frame<N>,
}

impl<'d, P: Instance, const S: usize, const N: usize> LedStrip<'d, P, S, N> {
    #[must_use]
    pub fn new(driver: PioWs2812<'d, P, S, N>) -> Self {
        Self {
            driver,
            frame: Frame::dark(),
        }
    }

    /// Render the current state and push it to the strip.
    ///
    /// The state is only locked while the frame is computed.
    pub async fn show(&mut self, state: &impl StateCell<N>) {
        let frame = &mut self.frame;
        state.with(|s| s.render(frame));
        self.driver.write(&self.frame.0).await;
    }
}
