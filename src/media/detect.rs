use embedded_hal::digital::InputPin;

pub trait MediaDetect {
    fn is_inserted(&mut self) -> bool;
}

// Boards without a detect line assume the card is always there.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysInserted;

impl MediaDetect for AlwaysInserted {
    fn is_inserted(&mut self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectLevel {
    Low,
    High,
}

pub struct DetectPin<P> {
    pin: P,
    inserted_level: DetectLevel,
}

impl<P: InputPin> DetectPin<P> {
    pub fn new(pin: P, inserted_level: DetectLevel) -> Self {
        Self {
            pin,
            inserted_level,
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> MediaDetect for DetectPin<P> {
    fn is_inserted(&mut self) -> bool {
        let level = match self.inserted_level {
            DetectLevel::High => self.pin.is_high(),
            DetectLevel::Low => self.pin.is_low(),
        };
        // An unreadable detect line reads as "no card".
        level.unwrap_or(false)
    }
}
