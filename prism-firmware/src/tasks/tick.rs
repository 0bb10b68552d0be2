//! PWM tick task
//!
//! Runs the tick multiplexer at the PWM step rate while a channel is dimming
//! and parks on the gate signal otherwise.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::TICK_GATE;
use crate::system::{TickGate, TICKS};

#[embassy_executor::task]
pub async fn tick_task(period_us: u32) {
    info!("Tick task started, period {} us", period_us);

    let mut ticker = Ticker::every(Duration::from_micros(u64::from(period_us)));

    loop {
        if !TICKS.timer(TickGate::is_running) {
            TICK_GATE.wait().await;
            ticker.reset();
            continue;
        }

        ticker.next().await;
        TICKS.notify();
    }
}
