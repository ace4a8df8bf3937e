//! Passes over HLS programs.
mod channel_check;
mod resource_rollup;
mod well_formed;

pub use channel_check::ChannelCheck;
pub use resource_rollup::ResourceRollup;
pub use well_formed::WellFormed;
