//! Compile-time board selection.
//!
//! # Hardware Configuration
//!
//! | Function          | Loop pad GPIO        | Work board GPIO |
//! |-------------------|----------------------|-----------------|
//! | Key switches      | 0–8                  | (matrix, not driven here) |
//! | Encoder switches  | 9, 10, 11            | 9               |
//! | Encoder A/B       | 12/13, 14/15, 16/17  | 12/13           |
//! | WS2812 data       | 22                   | 22              |

#[cfg(feature = "board-loop")]
mod selected {
    use pad_core::{Profile, LOOP_LED_COUNT};

    pub const PROFILE: Profile = Profile::LOOP;
    pub const LED_COUNT: usize = LOOP_LED_COUNT;
    pub const KEY_COUNT: usize = 9;
    pub const ENCODER_COUNT: usize = 3;
}

#[cfg(all(feature = "board-work", not(feature = "board-loop")))]
mod selected {
    use pad_core::{Profile, WORK_BOARD_LED_COUNT};

    pub const PROFILE: Profile = Profile::WORK_BOARD;
    pub const LED_COUNT: usize = WORK_BOARD_LED_COUNT;
    pub const KEY_COUNT: usize = 0;
    pub const ENCODER_COUNT: usize = 1;
}

pub use selected::{ENCODER_COUNT, KEY_COUNT, LED_COUNT, PROFILE};

/// Key and encoder-switch tasks share one pool.
pub const SWITCH_COUNT: usize = KEY_COUNT + ENCODER_COUNT;
