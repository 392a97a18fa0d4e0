pub mod tracker;

pub use tracker::DeviceTracker;
