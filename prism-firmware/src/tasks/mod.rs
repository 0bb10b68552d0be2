//! Embassy async tasks
//!
//! Each task stands in for one interrupt source or serves one channel.

pub mod edge;
pub mod tick;
pub mod timer;
pub mod uart;

pub use edge::edge_task;
pub use tick::tick_task;
pub use timer::timer_task;
pub use uart::{uart_rx_task, uart_tx_task};
