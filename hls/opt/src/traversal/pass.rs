use hls_ir as ir;
use hls_utils::HlsResult;

/// Trait that describes named things. Calling
/// [`do_pass_default`](Pass::do_pass_default) requires this to be
/// implemented.
///
/// This has to be a separate trait from [`Pass`] because these methods don't
/// recieve `self` which means that it is impossible to create dynamic trait
/// objects.
pub trait Named {
    /// The name of a pass. Is used for identifying passes.
    fn name() -> &'static str;
    /// A short description of the pass.
    fn description() -> &'static str;
}

/// Trait defining method that can be used to construct a pass from an
/// [ir::Program].
/// This is useful when a pass needs to construct information using the
/// program *before* running.
///
/// For passes that don't need to use the program, this trait can be
/// automatically be derived from [Default].
pub trait ConstructPass {
    /// Construct the pass using information from the program
    fn from(prog: &ir::Program) -> HlsResult<Self>
    where
        Self: Sized;
}

/// Derive ConstructPass when [Default] is provided for a pass.
impl<T: Default + Sized + Pass> ConstructPass for T {
    fn from(_prog: &ir::Program) -> HlsResult<Self> {
        Ok(T::default())
    }
}

/// A transformation or analysis over a whole program.
pub trait Pass {
    /// Precondition for this pass to run on the program. If this function
    /// returns None, the pass triggers. Otherwise it aborts and logs the
    /// string as the reason.
    fn precondition(_prog: &ir::Program) -> Option<String>
    where
        Self: Sized,
    {
        None
    }

    /// Run the pass over `prog`.
    fn run(&mut self, prog: &mut ir::Program) -> HlsResult<()>;

    /// Construct the pass with [ConstructPass::from] and run it.
    fn do_pass_default(prog: &mut ir::Program) -> HlsResult<Self>
    where
        Self: ConstructPass + Named + Sized,
    {
        let mut pass = Self::from(&*prog)?;
        if let Some(msg) = Self::precondition(&*prog) {
            log::info!("Skipping `{}': {msg}", Self::name());
            return Ok(pass);
        }
        pass.run(prog)?;
        Ok(pass)
    }
}
