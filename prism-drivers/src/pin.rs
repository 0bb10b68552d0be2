//! `embedded-hal` pin adapters
//!
//! Chip HALs implement `embedded-hal` 1.0; the drivers here are written
//! against `prism-hal`. Pin errors are infallible on every supported chip, a
//! failed read reports low and a failed write is dropped.

use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};

/// Input pin adapter
pub struct EhInput<P>(pub P);

impl<P: InputPin> prism_hal::InputPin for EhInput<P> {
    fn is_high(&mut self) -> bool {
        self.0.is_high().unwrap_or(false)
    }
}

/// Output pin adapter
pub struct EhOutput<P>(pub P);

impl<P: StatefulOutputPin> prism_hal::OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        let _ = OutputPin::set_high(&mut self.0);
    }

    fn set_low(&mut self) {
        let _ = OutputPin::set_low(&mut self.0);
    }

    fn toggle(&mut self) {
        let _ = StatefulOutputPin::toggle(&mut self.0);
    }

    fn is_set_high(&mut self) -> bool {
        StatefulOutputPin::is_set_high(&mut self.0).unwrap_or(false)
    }
}
