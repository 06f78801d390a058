pub mod constants;
pub mod errors;
pub mod interval;
pub mod params;
pub mod segment;
pub mod subsidy;

pub use interval::Interval;
pub use params::Params;
pub use segment::Segment;
pub use subsidy::SubsidySchedule;
