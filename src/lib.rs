pub mod interval_map;

pub use crate::interval_map::IntervalMap;
