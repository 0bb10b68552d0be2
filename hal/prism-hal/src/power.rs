//! Peripheral power bookkeeping
//!
//! Subjects that own a hardware resource tell the power manager when the
//! resource is needed so it can be kept clocked while the core sleeps.

/// Peripherals with an individual power-reduction bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    Twi,
    Timer0,
    Timer1,
    Timer2,
    Spi,
    Usart,
    Adc,
}

impl Peripheral {
    /// All peripherals, in bit order of [`Peripheral::mask`]
    pub const ALL: [Peripheral; 7] = [
        Peripheral::Adc,
        Peripheral::Usart,
        Peripheral::Spi,
        Peripheral::Timer1,
        Peripheral::Timer0,
        Peripheral::Timer2,
        Peripheral::Twi,
    ];

    /// Bit of this peripheral in the power-reduction register
    pub const fn mask(self) -> u8 {
        match self {
            Peripheral::Adc => 1 << 0,
            Peripheral::Usart => 1 << 1,
            Peripheral::Spi => 1 << 2,
            Peripheral::Timer1 => 1 << 3,
            Peripheral::Timer0 => 1 << 5,
            Peripheral::Timer2 => 1 << 6,
            Peripheral::Twi => 1 << 7,
        }
    }
}

/// Receiver of peripheral usage changes
///
/// Called from interrupt context as well as the main loop, hence `&self`.
pub trait PowerRegistrar {
    /// The peripheral must stay powered
    fn mark_in_use(&self, peripheral: Peripheral);

    /// The peripheral may be powered down
    fn mark_idle(&self, peripheral: Peripheral);
}
