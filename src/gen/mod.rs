pub mod noise;
pub mod oscillator;
pub mod waveform;

pub use self::noise::*;
pub use self::oscillator::*;
pub use self::waveform::*;
