//! Indicator trait - best-effort visual signal

/// Status light
///
/// Infallible by contract: a broken indicator never stops the logger.
pub trait Indicator: Send {
    fn on(&mut self);

    fn off(&mut self);

    fn is_on(&self) -> bool;
}

impl<I: Indicator + ?Sized> Indicator for Box<I> {
    fn on(&mut self) {
        (**self).on()
    }

    fn off(&mut self) {
        (**self).off()
    }

    fn is_on(&self) -> bool {
        (**self).is_on()
    }
}
