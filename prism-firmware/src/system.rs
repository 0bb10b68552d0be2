//! Firmware-wide event plumbing
//!
//! The interrupt multiplexers, the serial link and the event queue live in
//! statics so drivers can hold `'static` references to them. Their hardware
//! side is emulated by the service tasks: an edge task plays the pin-change
//! vector, the tick task plays the PWM timer.

use defmt::*;
use portable_atomic::{AtomicBool, Ordering};

use prism_core::interrupts::ports::PORT_COUNT;
use prism_core::interrupts::{PinChangeMux, TickMux};
use prism_core::link::SerialLink;
use prism_core::observer::EventObserver;
use prism_core::power::PowerManager;
use prism_core::{Event, EventQueue, HardwareId};
use prism_drivers::{UartReader, UartReceiver};
use prism_hal::{ByteSink, InputPin, InterruptSource, Peripheral, PinChangeSource};

use crate::board::EDGE_PINS;
use crate::channels::{EVENT_READY, TICK_GATE, TX_PIPE};

pub type Bank = PinChangeMux<'static, BankControl>;
pub type Ticks = TickMux<'static, TickGate, PowerManager>;
pub type Link = SerialLink<'static, UartReader<'static, 'static>, TxSink>;

/// Events waiting for the main loop
pub static QUEUE: EventQueue = EventQueue::new();

/// Peripheral power bookkeeping
pub static POWER: PowerManager = PowerManager::new();

/// Pin-change multiplexers, one per GPIO bank of eight
pub static BANKS: [Bank; PORT_COUNT] = [const { PinChangeMux::new(BankControl::new()) }; PORT_COUNT];

/// PWM tick multiplexer
pub static TICKS: Ticks = TickMux::new(TickGate::new(), &POWER, Peripheral::Timer2);

/// Receive buffer fed by the UART RX task
pub static UART_RX: UartReceiver<'static> = UartReceiver::new(HardwareId::Uart00);

/// Framed link to the RGB node
pub static LINK: Link = SerialLink::new(UART_RX.reader(), TxSink);

/// Entry point of every driver event
pub static DISPATCH: QueueWaker = QueueWaker::new(&QUEUE);

/// Last level sampled by each edge task
pub static LEVELS: [AtomicBool; EDGE_PINS] = [const { AtomicBool::new(false) }; EDGE_PINS];

/// Enable state and bit mask of a bank's pin-change vector
pub struct BankControl {
    enabled: bool,
    mask: u8,
}

impl BankControl {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            mask: 0,
        }
    }

    /// True if a change on `bit` raises the vector
    pub fn is_armed(&self, bit: u8) -> bool {
        self.enabled && self.mask & (1 << bit) != 0
    }
}

impl InterruptSource for BankControl {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

impl PinChangeSource for BankControl {
    fn unmask(&mut self, bit: u8) {
        self.mask |= 1 << bit;
    }

    fn mask(&mut self, bit: u8) {
        self.mask &= !(1 << bit);
    }
}

/// Run state of the PWM tick source
pub struct TickGate {
    running: bool,
}

impl TickGate {
    pub const fn new() -> Self {
        Self { running: false }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl InterruptSource for TickGate {
    fn enable(&mut self) {
        self.running = true;
        TICK_GATE.signal(());
    }

    fn disable(&mut self) {
        self.running = false;
    }
}

/// Input read from the level its edge task last sampled
pub struct SampledPin(pub &'static AtomicBool);

impl InputPin for SampledPin {
    fn is_high(&mut self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Transmit side of the link, drained by the UART TX task
pub struct TxSink;

impl ByteSink for TxSink {
    fn put_byte(&mut self, byte: u8) {
        if TX_PIPE.try_write(&[byte]).is_err() {
            warn!("TX pipe full, dropping byte {=u8:#04x}", byte);
        }
    }
}

/// Queues driver events and wakes the main loop
pub struct QueueWaker {
    queue: &'static EventQueue,
}

impl QueueWaker {
    pub const fn new(queue: &'static EventQueue) -> Self {
        Self { queue }
    }
}

impl EventObserver for QueueWaker {
    fn update(&self, event: &Event) {
        if self.queue.enqueue(*event).is_err() {
            warn!("Event queue full, dropping {:?}", event);
        }
        EVENT_READY.signal(());
    }
}
