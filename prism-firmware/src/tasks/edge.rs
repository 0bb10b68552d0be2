//! Pin edge task
//!
//! Waits for edges on one input, records its level and raises the bank's
//! pin-change vector when the pin is unmasked.

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::{AtomicBool, Ordering};

use crate::board::EDGE_PINS;
use crate::system::Bank;

#[embassy_executor::task(pool_size = EDGE_PINS)]
pub async fn edge_task(
    mut input: Input<'static>,
    level: &'static AtomicBool,
    bank: &'static Bank,
    bit: u8,
) {
    debug!("Edge task started for bank bit {}", bit);

    loop {
        input.wait_for_any_edge().await;
        level.store(input.is_high(), Ordering::Relaxed);

        if bank.control(|control| control.is_armed(bit)) {
            bank.notify();
        }
    }
}
