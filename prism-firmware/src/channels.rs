//! Inter-task communication channels
//!
//! Static embassy-sync primitives connecting the interrupt-side drivers, the
//! service tasks and the main loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;
use embassy_sync::signal::Signal;

/// Outgoing UART bytes buffered between the link and the TX task
const TX_PIPE_SIZE: usize = 64;

/// Pending timer commands
const TIMER_COMMAND_DEPTH: usize = 4;

/// Controller timer request
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum TimerCommand {
    /// Arm timer `id`, replacing the running one
    Start { id: u8, duration_ms: u32 },
    /// Disarm timer `id` if it is the running one
    Stop { id: u8 },
}

/// An event was queued for the main loop
pub static EVENT_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// The tick source was enabled
pub static TICK_GATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Requests to the timer task
pub static TIMER_COMMANDS: Channel<CriticalSectionRawMutex, TimerCommand, TIMER_COMMAND_DEPTH> =
    Channel::new();

/// Encoded frames waiting for the UART
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_PIPE_SIZE> = Pipe::new();
