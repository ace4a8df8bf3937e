//! Scheduling, resource and directive metadata attached to IR nodes.
//!
//! Every record is a plain `Copy` value. Records are attached and replaced
//! whole: a getter hands out a copy, so the only way to change an attached
//! record is to set a new one.
use hls_utils::{Error, HlsResult};
use std::collections::BTreeSet;
use std::str::FromStr;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Memory implementation kinds. The discriminants are persisted and must not
/// be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(into = "u32", try_from = "u32")
)]
#[repr(u32)]
pub enum MemoryKind {
    /// Simple dual-port BRAM
    BramS2p = 0,
    /// True dual-port BRAM
    BramT2p = 1,
    /// Single-port BRAM
    Bram1p = 2,
    /// Off-chip memory
    Dram = 3,
}

/// Array partition kinds. The discriminants are persisted and must not be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(into = "u32", try_from = "u32")
)]
#[repr(u32)]
pub enum PartitionKind {
    Cyclic = 0,
    Block = 1,
    None = 2,
}

impl MemoryKind {
    pub const ALL: [MemoryKind; 4] = [
        MemoryKind::BramS2p,
        MemoryKind::BramT2p,
        MemoryKind::Bram1p,
        MemoryKind::Dram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::BramS2p => "bram_s2p",
            MemoryKind::BramT2p => "bram_t2p",
            MemoryKind::Bram1p => "bram_1p",
            MemoryKind::Dram => "dram",
        }
    }
}

impl PartitionKind {
    pub const ALL: [PartitionKind; 3] =
        [PartitionKind::Cyclic, PartitionKind::Block, PartitionKind::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionKind::Cyclic => "cyclic",
            PartitionKind::Block => "block",
            PartitionKind::None => "none",
        }
    }
}

impl From<MemoryKind> for u32 {
    fn from(kind: MemoryKind) -> Self {
        kind as u32
    }
}

impl From<PartitionKind> for u32 {
    fn from(kind: PartitionKind) -> Self {
        kind as u32
    }
}

impl TryFrom<u32> for MemoryKind {
    type Error = Error;

    fn try_from(tag: u32) -> HlsResult<Self> {
        MemoryKind::ALL.get(tag as usize).copied().ok_or_else(|| {
            Error::malformed_structure(format!("Unknown memory kind tag {tag}"))
        })
    }
}

impl TryFrom<u32> for PartitionKind {
    type Error = Error;

    fn try_from(tag: u32) -> HlsResult<Self> {
        PartitionKind::ALL.get(tag as usize).copied().ok_or_else(|| {
            Error::malformed_structure(format!(
                "Unknown partition kind tag {tag}"
            ))
        })
    }
}

impl FromStr for MemoryKind {
    type Err = Error;

    fn from_str(s: &str) -> HlsResult<Self> {
        MemoryKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                Error::malformed_structure(format!("Unknown memory kind `{s}'"))
            })
    }
}

impl FromStr for PartitionKind {
    type Err = Error;

    fn from_str(s: &str) -> HlsResult<Self> {
        PartitionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                Error::malformed_structure(format!(
                    "Unknown partition kind `{s}'"
                ))
            })
    }
}

impl std::fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schedule of a node: absolute start and end cycle, total latency and the
/// steady-state issue interval. `begin <= end` is the producer's
/// responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(from = "(i64, i64, i64, i64)", into = "(i64, i64, i64, i64)")
)]
pub struct Timing {
    pub begin: i64,
    pub end: i64,
    pub latency: i64,
    pub interval: i64,
}

/// Estimated hardware resources consumed by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(from = "(u64, u64, u64)", into = "(u64, u64, u64)")
)]
pub struct Resource {
    pub lut: u64,
    pub dsp: u64,
    pub bram: u64,
}

/// Scheduling facts derived for a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(from = "(i64, i64, i64)", into = "(i64, i64, i64)")
)]
pub struct LoopInfo {
    /// Trip count after flattening all nested loops.
    pub flatten_trip_count: i64,
    /// Latency of a single iteration.
    pub iter_latency: i64,
    /// Minimum achievable initiation interval.
    pub min_ii: i64,
}

/// Scheduling intent for a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(from = "(bool, i64, bool, bool)", into = "(bool, i64, bool, bool)")
)]
pub struct LoopDirective {
    pub pipeline: bool,
    pub target_ii: i64,
    pub dataflow: bool,
    pub flatten: bool,
}

/// Scheduling intent for a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(from = "(bool, i64, bool)", into = "(bool, i64, bool)")
)]
pub struct FuncDirective {
    pub pipeline: bool,
    pub target_interval: i64,
    pub dataflow: bool,
}

impl Timing {
    pub fn new(begin: i64, end: i64, latency: i64, interval: i64) -> Self {
        Self {
            begin,
            end,
            latency,
            interval,
        }
    }
}

impl Resource {
    pub fn new(lut: u64, dsp: u64, bram: u64) -> Self {
        Self { lut, dsp, bram }
    }
}

impl LoopInfo {
    pub fn new(flatten_trip_count: i64, iter_latency: i64, min_ii: i64) -> Self {
        Self {
            flatten_trip_count,
            iter_latency,
            min_ii,
        }
    }
}

impl LoopDirective {
    pub fn new(
        pipeline: bool,
        target_ii: i64,
        dataflow: bool,
        flatten: bool,
    ) -> Self {
        Self {
            pipeline,
            target_ii,
            dataflow,
            flatten,
        }
    }
}

impl FuncDirective {
    pub fn new(pipeline: bool, target_interval: i64, dataflow: bool) -> Self {
        Self {
            pipeline,
            target_interval,
            dataflow,
        }
    }
}

impl Resource {
    /// Field-wise sum, or `None` if any field overflows.
    pub fn checked_add(self, rhs: Resource) -> Option<Resource> {
        Some(Resource {
            lut: self.lut.checked_add(rhs.lut)?,
            dsp: self.dsp.checked_add(rhs.dsp)?,
            bram: self.bram.checked_add(rhs.bram)?,
        })
    }
}

/* ============= Field tuple conversions used by the interchange format ============= */

impl From<(i64, i64, i64, i64)> for Timing {
    fn from((begin, end, latency, interval): (i64, i64, i64, i64)) -> Self {
        Timing::new(begin, end, latency, interval)
    }
}

impl From<Timing> for (i64, i64, i64, i64) {
    fn from(t: Timing) -> Self {
        (t.begin, t.end, t.latency, t.interval)
    }
}

impl From<(u64, u64, u64)> for Resource {
    fn from((lut, dsp, bram): (u64, u64, u64)) -> Self {
        Resource::new(lut, dsp, bram)
    }
}

impl From<Resource> for (u64, u64, u64) {
    fn from(r: Resource) -> Self {
        (r.lut, r.dsp, r.bram)
    }
}

impl From<(i64, i64, i64)> for LoopInfo {
    fn from((trip, latency, ii): (i64, i64, i64)) -> Self {
        LoopInfo::new(trip, latency, ii)
    }
}

impl From<LoopInfo> for (i64, i64, i64) {
    fn from(l: LoopInfo) -> Self {
        (l.flatten_trip_count, l.iter_latency, l.min_ii)
    }
}

impl From<(bool, i64, bool, bool)> for LoopDirective {
    fn from((pipeline, ii, dataflow, flatten): (bool, i64, bool, bool)) -> Self {
        LoopDirective::new(pipeline, ii, dataflow, flatten)
    }
}

impl From<LoopDirective> for (bool, i64, bool, bool) {
    fn from(d: LoopDirective) -> Self {
        (d.pipeline, d.target_ii, d.dataflow, d.flatten)
    }
}

impl From<(bool, i64, bool)> for FuncDirective {
    fn from((pipeline, interval, dataflow): (bool, i64, bool)) -> Self {
        FuncDirective::new(pipeline, interval, dataflow)
    }
}

impl From<FuncDirective> for (bool, i64, bool) {
    fn from(d: FuncDirective) -> Self {
        (d.pipeline, d.target_interval, d.dataflow)
    }
}

/// Presence-only facts about a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BoolAttr {
    /// Loop iterations may overlap or be reordered.
    Parallel,
    /// Loop with a single iteration.
    Point,
    /// Entry point of synthesis.
    TopFunc,
    /// Function stays in software.
    Runtime,
}

impl BoolAttr {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolAttr::Parallel => "parallel",
            BoolAttr::Point => "point",
            BoolAttr::TopFunc => "top_func",
            BoolAttr::Runtime => "runtime",
        }
    }
}

impl std::fmt::Display for BoolAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes associated with a node or function. Every record kind has its
/// own slot; an empty slot means the record was never set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Attributes {
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    timing: Option<Timing>,
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    resource: Option<Resource>,
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    loop_info: Option<LoopInfo>,
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    loop_directive: Option<LoopDirective>,
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    func_directive: Option<FuncDirective>,
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "BTreeSet::is_empty")
    )]
    markers: BTreeSet<BoolAttr>,
}

/// A record kind that occupies a slot in [Attributes].
pub trait Record: Copy {
    /// Name of the record kind, used in diagnostics.
    const NAME: &'static str;

    fn slot(attrs: &Attributes) -> &Option<Self>;

    fn slot_mut(attrs: &mut Attributes) -> &mut Option<Self>;
}

macro_rules! impl_record {
    ($record:ty, $field:ident, $name:literal) => {
        impl Record for $record {
            const NAME: &'static str = $name;

            fn slot(attrs: &Attributes) -> &Option<Self> {
                &attrs.$field
            }

            fn slot_mut(attrs: &mut Attributes) -> &mut Option<Self> {
                &mut attrs.$field
            }
        }
    };
}

impl_record!(Timing, timing, "timing");
impl_record!(Resource, resource, "resource");
impl_record!(LoopInfo, loop_info, "loop_info");
impl_record!(LoopDirective, loop_directive, "loop_directive");
impl_record!(FuncDirective, func_directive, "func_directive");

impl Attributes {
    /// Get the attached record of kind `R`, if any.
    pub fn get<R: Record>(&self) -> Option<R> {
        *R::slot(self)
    }

    /// Attach `record`, replacing any record of the same kind.
    pub fn set<R: Record>(&mut self, record: R) {
        *R::slot_mut(self) = Some(record);
    }

    /// Check if a marker has been set
    pub fn has(&self, key: BoolAttr) -> bool {
        self.markers.contains(&key)
    }

    /// Set a marker. Setting a marker twice has no further effect.
    pub fn insert(&mut self, key: BoolAttr) {
        self.markers.insert(key);
    }

    /// Iterate over the markers in a stable order.
    pub fn markers(&self) -> impl Iterator<Item = BoolAttr> + '_ {
        self.markers.iter().copied()
    }

    /// Returns true if no record or marker has been set
    pub fn is_empty(&self) -> bool {
        self.timing.is_none()
            && self.resource.is_none()
            && self.loop_info.is_none()
            && self.loop_directive.is_none()
            && self.func_directive.is_none()
            && self.markers.is_empty()
    }
}

/// Structs that can return an [`Attributes`] instance.
pub trait GetAttributes {
    /// Returns an [`Attributes`] instance
    fn get_attributes(&self) -> &Attributes;

    /// Returns a mutable [`Attributes`] instance
    fn get_mut_attributes(&mut self) -> &mut Attributes;
}

/// Typed accessors for every record and marker kind. Getters never fail and
/// setters replace the whole record.
pub trait HlsAttributes: GetAttributes {
    fn timing(&self) -> Option<Timing> {
        self.get_attributes().get()
    }

    fn set_timing(&mut self, timing: Timing) {
        self.get_mut_attributes().set(timing)
    }

    fn set_timing_fields(
        &mut self,
        begin: i64,
        end: i64,
        latency: i64,
        interval: i64,
    ) {
        self.set_timing(Timing::new(begin, end, latency, interval))
    }

    fn resource(&self) -> Option<Resource> {
        self.get_attributes().get()
    }

    fn set_resource(&mut self, resource: Resource) {
        self.get_mut_attributes().set(resource)
    }

    fn set_resource_fields(&mut self, lut: u64, dsp: u64, bram: u64) {
        self.set_resource(Resource::new(lut, dsp, bram))
    }

    fn loop_info(&self) -> Option<LoopInfo> {
        self.get_attributes().get()
    }

    fn set_loop_info(&mut self, loop_info: LoopInfo) {
        self.get_mut_attributes().set(loop_info)
    }

    fn set_loop_info_fields(
        &mut self,
        flatten_trip_count: i64,
        iter_latency: i64,
        min_ii: i64,
    ) {
        self.set_loop_info(LoopInfo::new(
            flatten_trip_count,
            iter_latency,
            min_ii,
        ))
    }

    fn loop_directive(&self) -> Option<LoopDirective> {
        self.get_attributes().get()
    }

    fn set_loop_directive(&mut self, directive: LoopDirective) {
        self.get_mut_attributes().set(directive)
    }

    fn set_loop_directive_fields(
        &mut self,
        pipeline: bool,
        target_ii: i64,
        dataflow: bool,
        flatten: bool,
    ) {
        self.set_loop_directive(LoopDirective::new(
            pipeline, target_ii, dataflow, flatten,
        ))
    }

    fn func_directive(&self) -> Option<FuncDirective> {
        self.get_attributes().get()
    }

    fn set_func_directive(&mut self, directive: FuncDirective) {
        self.get_mut_attributes().set(directive)
    }

    fn set_func_directive_fields(
        &mut self,
        pipeline: bool,
        target_interval: i64,
        dataflow: bool,
    ) {
        self.set_func_directive(FuncDirective::new(
            pipeline,
            target_interval,
            dataflow,
        ))
    }

    fn has_parallel(&self) -> bool {
        self.get_attributes().has(BoolAttr::Parallel)
    }

    fn set_parallel(&mut self) {
        self.get_mut_attributes().insert(BoolAttr::Parallel)
    }

    fn has_point(&self) -> bool {
        self.get_attributes().has(BoolAttr::Point)
    }

    fn set_point(&mut self) {
        self.get_mut_attributes().insert(BoolAttr::Point)
    }

    fn has_top_func(&self) -> bool {
        self.get_attributes().has(BoolAttr::TopFunc)
    }

    fn set_top_func(&mut self) {
        self.get_mut_attributes().insert(BoolAttr::TopFunc)
    }

    fn has_runtime(&self) -> bool {
        self.get_attributes().has(BoolAttr::Runtime)
    }

    fn set_runtime(&mut self) {
        self.get_mut_attributes().insert(BoolAttr::Runtime)
    }
}

impl<T: GetAttributes + ?Sized> HlsAttributes for T {}

impl GetAttributes for Attributes {
    fn get_attributes(&self) -> &Attributes {
        self
    }

    fn get_mut_attributes(&mut self) -> &mut Attributes {
        self
    }
}
