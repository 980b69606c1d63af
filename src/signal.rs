//! Sample-by-sample signal abstraction shared by the synthesizer.
//!
//! Every ambient sound generator is a `Signal`: a source that produces one
//! sample per call. Generators that transform another source (such as the
//! brown-noise filter) take their input as a `Signal` too, which lets tests
//! inject a fixed sequence in place of a random one.

/// Common interface for all sample sources and processors.
pub trait Signal {
    /// Generates the next sample from the signal.
    ///
    /// # Returns
    ///
    /// A sample value, typically between -1.0 and 1.0 for audio signals
    fn next_sample(&mut self) -> f64;

    /// Generates multiple samples into a buffer.
    ///
    /// Default implementation calls `next_sample()` for each element.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Mutable slice to fill with samples
    fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

/// A constant signal.
///
/// # Examples
///
/// ```
/// use stillwater::Signal;
///
/// let mut constant = 0.5_f64;
/// assert_eq!(constant.next_sample(), 0.5);
/// ```
impl Signal for f64 {
    fn next_sample(&mut self) -> f64 {
        *self
    }

    fn process(&mut self, buffer: &mut [f64]) {
        buffer.fill(*self);
    }
}

/// A signal backed by a closure. Created with [`from_fn`].
pub struct FromFn<F> {
    f: F,
}

/// Wraps a closure as a `Signal`.
///
/// # Examples
///
/// ```
/// use stillwater::signal::{from_fn, Signal};
///
/// let mut values = [1.0, -1.0].into_iter().cycle();
/// let mut alternating = from_fn(move || values.next().unwrap_or(0.0));
/// assert_eq!(alternating.next_sample(), 1.0);
/// assert_eq!(alternating.next_sample(), -1.0);
/// ```
pub fn from_fn<F: FnMut() -> f64>(f: F) -> FromFn<F> {
    FromFn { f }
}

impl<F: FnMut() -> f64> Signal for FromFn<F> {
    fn next_sample(&mut self) -> f64 {
        (self.f)()
    }
}
