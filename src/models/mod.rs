// Domain models

mod counters;
mod sample;

pub use counters::{CounterReading, IoCounters, IoDeltas};
pub use sample::Sample;
