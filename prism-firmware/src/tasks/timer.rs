//! Controller timeout service
//!
//! One timer runs at a time; starting a new one replaces it. Expiry is
//! delivered as a `Timer01`/`TimerExpire` event carrying the timer id.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};

use prism_core::observer::EventObserver;
use prism_core::{Event, EventKind, HardwareId};

use crate::channels::{TimerCommand, TIMER_COMMANDS};
use crate::system::DISPATCH;

#[embassy_executor::task]
pub async fn timer_task() {
    info!("Timer task started");

    let mut armed: Option<(u8, Instant)> = None;

    loop {
        let command = match armed {
            Some((id, deadline)) => {
                match select(TIMER_COMMANDS.receive(), Timer::at(deadline)).await {
                    Either::First(command) => command,
                    Either::Second(()) => {
                        trace!("Timer {} expired", id);
                        armed = None;
                        DISPATCH.update(&Event::new(HardwareId::Timer01, EventKind::TimerExpire, id));
                        continue;
                    }
                }
            }
            None => TIMER_COMMANDS.receive().await,
        };

        match command {
            TimerCommand::Start { id, duration_ms } => {
                let deadline = Instant::now() + Duration::from_millis(u64::from(duration_ms));
                armed = Some((id, deadline));
            }
            TimerCommand::Stop { id } => {
                if matches!(armed, Some((running, _)) if running == id) {
                    armed = None;
                }
            }
        }
    }
}
