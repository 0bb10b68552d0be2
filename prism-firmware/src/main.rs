//! Prism - RGB Lighting Controller Firmware
//!
//! Main firmware binary for RP2040-based controller boards. Three front
//! buttons and a rotary encoder drive a remote RGB node over a framed UART
//! link; three PWM LEDs show the levels the node reports back.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use portable_atomic::Ordering;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use prism_core::config::ControllerConfig;
use prism_core::controller::{ControllerState, RgbController};
use prism_core::interrupts::{port_of, Port, PortMuxes};
use prism_core::{Error, HardwareId, StateMachine};
use prism_drivers::{Button, EhOutput, PwmChannel, RotaryEncoder};
use prism_hal::PinId;

use crate::board::{edge_pins, EDGE_PINS};
use crate::channels::EVENT_READY;
use crate::controller::{Feedback, FirmwareIo};
use crate::system::{SampledPin, BANKS, DISPATCH, LEVELS, LINK, POWER, QUEUE, TICKS, UART_RX};

mod board;
mod channels;
mod controller;
mod system;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

type PanelButton = Button<'static, SampledPin>;
type Encoder = RotaryEncoder<'static, SampledPin, SampledPin>;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

// Drivers are referenced by the multiplexers they attach to
static BUTTONS: StaticCell<[PanelButton; 3]> = StaticCell::new();
static ENCODER: StaticCell<Encoder> = StaticCell::new();
static ENCODER_BUTTON: StaticCell<PanelButton> = StaticCell::new();
static FEEDBACK: StaticCell<[Feedback; 3]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Prism controller starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let pins = board::PINS;
    if let Err(e) = pins.validate() {
        error!("Board pin table invalid: {:?}", e);
    }

    // Inputs in edge_pins() order, levels sampled before any driver reads them
    let edge = edge_pins(&pins);
    let inputs: [Input<'static>; EDGE_PINS] = [
        Input::new(p.PIN_2, board::pull(edge[0])),
        Input::new(p.PIN_3, board::pull(edge[1])),
        Input::new(p.PIN_4, board::pull(edge[2])),
        Input::new(p.PIN_5, board::pull(edge[3])),
        Input::new(p.PIN_6, board::pull(edge[4])),
        Input::new(p.PIN_7, board::pull(edge[5])),
    ];
    for (input, level) in inputs.iter().zip(LEVELS.iter()) {
        level.store(input.is_high(), Ordering::Relaxed);
    }

    let ports = PortMuxes::new()
        .with_port(Port::A, &BANKS[0])
        .with_port(Port::B, &BANKS[1])
        .with_port(Port::C, &BANKS[2])
        .with_port(Port::D, &BANKS[3]);

    let buttons: &'static [PanelButton; 3] = BUTTONS.init([
        Button::new(
            HardwareId::Button01,
            SampledPin(&LEVELS[0]),
            pins.buttons[0].inverted,
            ports.binding(PinId(pins.buttons[0].pin)),
        ),
        Button::new(
            HardwareId::Button02,
            SampledPin(&LEVELS[1]),
            pins.buttons[1].inverted,
            ports.binding(PinId(pins.buttons[1].pin)),
        ),
        Button::new(
            HardwareId::Button03,
            SampledPin(&LEVELS[2]),
            pins.buttons[2].inverted,
            ports.binding(PinId(pins.buttons[2].pin)),
        ),
    ]);
    let encoder: &'static Encoder = ENCODER.init(RotaryEncoder::new(
        HardwareId::RotaryEncoder01,
        (SampledPin(&LEVELS[3]), ports.binding(PinId(pins.encoder_a.pin))),
        (SampledPin(&LEVELS[4]), ports.binding(PinId(pins.encoder_b.pin))),
    ));
    let encoder_button: &'static PanelButton = ENCODER_BUTTON.init(Button::new(
        HardwareId::RotaryEncoder01,
        SampledPin(&LEVELS[5]),
        pins.encoder_button.inverted,
        ports.binding(PinId(pins.encoder_button.pin)),
    ));

    for button in buttons {
        report_attach("button", button.attach(&DISPATCH));
    }
    report_attach("encoder", encoder.attach(&DISPATCH));
    report_attach("encoder switch", encoder_button.attach(&DISPATCH));
    info!("Inputs initialized");

    let feedback: &'static [Feedback; 3] = FEEDBACK.init([
        PwmChannel::new(
            EhOutput(Output::new(p.PIN_16, Level::Low)),
            board::FEEDBACK_POLARITY,
            &TICKS,
        ),
        PwmChannel::new(
            EhOutput(Output::new(p.PIN_17, Level::Low)),
            board::FEEDBACK_POLARITY,
            &TICKS,
        ),
        PwmChannel::new(
            EhOutput(Output::new(p.PIN_18, Level::Low)),
            board::FEEDBACK_POLARITY,
            &TICKS,
        ),
    ]);
    info!("Feedback LEDs initialized");

    // Setup UART for the node link
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        board::uart_config(&config.link.uart),
    );
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    UART_RX.attach(&LINK);
    LINK.attach(&DISPATCH);
    info!("UART initialized at {} baud", config.link.uart.baudrate);

    // Spawn tasks
    unwrap!(spawner.spawn(tasks::tick_task(config.pwm.tick_period_us())));
    unwrap!(spawner.spawn(tasks::timer_task()));
    unwrap!(spawner.spawn(tasks::uart_rx_task(rx)));
    unwrap!(spawner.spawn(tasks::uart_tx_task(tx)));
    for ((input, pin), level) in inputs.into_iter().zip(edge).zip(LEVELS.iter()) {
        let Some(location) = port_of(PinId(pin.pin)) else {
            warn!("GPIO {} has no pin-change bank, not watched", pin.pin);
            continue;
        };
        unwrap!(spawner.spawn(tasks::edge_task(
            input,
            level,
            &BANKS[location.port.index()],
            location.bit,
        )));
    }

    POWER.enable_sleep();

    let io = FirmwareIo::new(&LINK, feedback);
    let mut machine = StateMachine::new(RgbController::new(io, config), ControllerState::Idle);
    machine.start();

    info!("All tasks spawned, controller running");

    loop {
        while let Some(event) = QUEUE.dequeue() {
            debug!("Event: {:?}", event);
            machine.process(&event);
        }

        let errors = LINK.take_line_errors();
        if !errors.is_empty() {
            warn!("Node link line errors: {=u8:#04x}", errors.bits());
        }

        if POWER.may_sleep() {
            trace!("Idle, power reduction {=u8:#010b}", POWER.reduction_mask());
            EVENT_READY.wait().await;
        } else {
            yield_now().await;
        }
    }
}

/// Board configuration, or the defaults if it does not validate
fn load_config() -> ControllerConfig {
    let config = board::controller_config();
    match config.validate() {
        Ok(()) => {
            info!(
                "Node {}, {:?} model, PWM {} Hz",
                config.node_address, config.color_model, config.pwm.frequency_hz
            );
            config
        }
        Err(e) => {
            error!("Invalid controller configuration: {:?}", e);
            error!("Using default configuration");
            ControllerConfig::default()
        }
    }
}

fn report_attach(what: &str, result: Result<(), Error>) {
    if let Err(e) = result {
        error!("Failed to attach {}: {:?}", what, e);
    }
}
