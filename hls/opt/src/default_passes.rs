//! Defines the default passes available to [PassManager].
use crate::pass_manager::{PassManager, PassResult};
use crate::passes::{ChannelCheck, ResourceRollup, WellFormed};
use crate::traversal::Named;

impl PassManager {
    pub fn default_passes() -> PassResult<Self> {
        let mut pm = PassManager::default();

        pm.register_check::<WellFormed>()?;
        pm.register_check::<ChannelCheck>()?;

        pm.register_pass::<ResourceRollup>()?;

        pm.add_alias("validate", &[WellFormed::name(), ChannelCheck::name()])?;
        pm.add_alias("all", &["validate", ResourceRollup::name()])?;

        Ok(pm)
    }
}
