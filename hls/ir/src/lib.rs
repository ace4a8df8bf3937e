//! Internal representation for the HLS compiler.
//!
//! The representation is a flat program graph of [`Function`]s, [`Node`]s and
//! [`Value`]s decorated with scheduling and resource metadata. Nodes that
//! declare stream channels can have their users resolved across function
//! call and return boundaries with [`stream_channel_users`].

// Modules defining internal structures.
mod attributes;
mod builder;
mod structure;
mod types;

/// Stream channel contract and resolution.
pub mod stream;

// Re-export types at the module level.
pub use attributes::{
    Attributes, BoolAttr, FuncDirective, GetAttributes, HlsAttributes,
    LoopDirective, LoopInfo, MemoryKind, PartitionKind, Record, Resource,
    Timing,
};
pub use builder::Builder;
pub use hls_utils::{GetName, Id};
pub use stream::{
    ChannelEndpoints, channel_users, declares_channel, stream_channel_users,
    verify_channel_decl,
};
pub use structure::{
    FuncIdx, Function, Node, NodeIdx, NodeKind, Program, Use, Value, ValueDef,
    ValueIdx,
};
pub use types::Type;

/// Interchange format for programs and their attributes.
#[cfg(feature = "serialize")]
pub mod def;

/// Module to transform program definitions into IR.
#[cfg(feature = "serialize")]
pub mod from_def;

/// Module to transform IR back into program definitions.
#[cfg(feature = "serialize")]
pub mod to_def;
