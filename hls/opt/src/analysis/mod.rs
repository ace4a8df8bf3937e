//! Analyses over HLS programs.
//!
//! The analyses construct data-structures that make answering certain queries
//! about programs easier.

mod call_graph;
mod channel_topology;

pub use call_graph::CallGraph;
pub use channel_topology::{ChannelInfo, ChannelTopology};
