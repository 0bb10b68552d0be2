//! Node UART tasks
//!
//! The RX task plays the receive interrupt: every byte goes to the receive
//! buffer, which wakes the serial link. The TX task drains the link's pipe.

use defmt::*;
use embassy_rp::uart::{self, BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use prism_hal::RxFlags;

use crate::channels::TX_PIPE;
use crate::system::UART_RX;

/// Bytes read from the UART per call
const RX_CHUNK: usize = 16;

/// Bytes written to the UART per call
const TX_CHUNK: usize = 16;

fn line_error(error: uart::Error) -> RxFlags {
    match error {
        uart::Error::Overrun => RxFlags::OVERRUN,
        _ => RxFlags::FRAME_ERROR,
    }
}

#[embassy_executor::task]
pub async fn uart_rx_task(mut rx: BufferedUartRx) {
    info!("UART RX task started");

    let mut buf = [0u8; RX_CHUNK];
    // Errors are reported with the next byte received
    let mut pending = RxFlags::NONE;

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    let flags = core::mem::replace(&mut pending, RxFlags::NONE);
                    if !UART_RX.receive(byte, flags) {
                        warn!("UART receive buffer full, byte dropped");
                    }
                }
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                pending = pending.union(line_error(e));
            }
        }
    }
}

#[embassy_executor::task]
pub async fn uart_tx_task(mut tx: BufferedUartTx) {
    info!("UART TX task started");

    let mut buf = [0u8; TX_CHUNK];

    loop {
        let n = TX_PIPE.read(&mut buf).await;
        if let Err(e) = tx.write_all(&buf[..n]).await {
            warn!("UART write error: {:?}", e);
        }
    }
}
