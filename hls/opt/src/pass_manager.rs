//! Registration and scheduling of passes.
use crate::traversal::{ConstructPass, DiagnosticPass, Diagnostics, Named, Pass};
use hls_ir as ir;
use hls_utils::{Error, HlsResult, MultiError};
use linked_hash_map::LinkedHashMap;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::time::Instant;

pub type PassResult<T> = std::result::Result<T, MultiError>;

/// Whether a pass only inspects the program or also annotates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Check,
    Annotate,
}

type Runner = Box<dyn Fn(&mut ir::Program) -> HlsResult<Diagnostics>>;

struct Registered {
    description: &'static str,
    stage: Stage,
    run: Runner,
}

/// All passes and aliases known to the driver, in registration order.
#[derive(Default)]
pub struct PassManager {
    passes: LinkedHashMap<&'static str, Registered>,
    /// Alias names to the passes they expand to.
    aliases: LinkedHashMap<&'static str, Vec<&'static str>>,
}

impl PassManager {
    /// Register a pass that annotates the program.
    pub fn register_pass<P>(&mut self) -> PassResult<()>
    where
        P: Pass + ConstructPass + Named,
    {
        self.insert::<P>(
            Stage::Annotate,
            Box::new(|prog| {
                P::do_pass_default(prog)?;
                Ok(Diagnostics::default())
            }),
        )
    }

    /// Register a pass that reports [Diagnostics] about the program.
    pub fn register_check<P>(&mut self) -> PassResult<()>
    where
        P: Pass + ConstructPass + Named + DiagnosticPass,
    {
        self.insert::<P>(
            Stage::Check,
            Box::new(|prog| Ok(P::do_pass_default(prog)?.take_diagnostics())),
        )
    }

    fn insert<P: Named>(&mut self, stage: Stage, run: Runner) -> PassResult<()> {
        let name = P::name();
        self.ensure_fresh(name)?;
        self.passes.insert(
            name,
            Registered {
                description: P::description(),
                stage,
                run,
            },
        );
        Ok(())
    }

    fn ensure_fresh(&self, name: &str) -> HlsResult<()> {
        if self.passes.contains_key(name) || self.aliases.contains_key(name) {
            return Err(Error::misc(format!("`{name}' is registered twice")));
        }
        Ok(())
    }

    /// Name a sequence of passes. Members may be earlier aliases.
    pub fn add_alias(
        &mut self,
        alias: &'static str,
        members: &[&str],
    ) -> PassResult<()> {
        self.ensure_fresh(alias)?;
        let mut expanded = Vec::new();
        for member in members {
            expanded.extend(self.expand(member)?);
        }
        self.aliases.insert(alias, expanded);
        Ok(())
    }

    /// The passes a pass or alias name stands for.
    fn expand(&self, name: &str) -> HlsResult<Vec<&'static str>> {
        if let Some(members) = self.aliases.get(name) {
            return Ok(members.clone());
        }
        self.passes
            .keys()
            .find(|pass| **pass == name)
            .map(|pass| vec![*pass])
            .ok_or_else(|| {
                Error::misc(format!(
                    "Unknown pass or alias `{name}'. Run with --list-passes to see what is registered."
                ))
            })
    }

    /// One-line help for a pass, or the expansion of an alias.
    pub fn describe(&self, name: &str) -> Option<String> {
        if let Some(pass) = self.passes.get(name) {
            let stage = match pass.stage {
                Stage::Check => "check",
                Stage::Annotate => "annotation",
            };
            return Some(format!("{name} ({stage}): {}", pass.description));
        }
        self.aliases
            .get(name)
            .map(|members| format!("{name}: runs {}", members.join(", ")))
    }

    /// Help text listing every pass and alias.
    pub fn list(&self) -> String {
        let mut out = String::from("Passes:\n");
        for (name, pass) in self.passes.iter() {
            let _ = writeln!(out, "- {name}: {}", pass.description);
        }
        out.push_str("\nAliases:\n");
        for (name, members) in self.aliases.iter() {
            let _ = writeln!(out, "- {name}: {}", members.join(", "));
        }
        out
    }

    /// Passes named by `incl` that are not named by `excl`, in order.
    fn plan(
        &self,
        incl: &[String],
        excl: &[String],
    ) -> HlsResult<Vec<(&'static str, &Registered)>> {
        let mut disabled = HashSet::new();
        for name in excl {
            disabled.extend(self.expand(name)?);
        }
        let mut plan = Vec::new();
        for name in incl {
            for pass in self.expand(name)? {
                if disabled.contains(pass) {
                    log::info!("{pass}: disabled");
                } else if let Some(registered) = self.passes.get(pass) {
                    plan.push((pass, registered));
                }
            }
        }
        Ok(plan)
    }

    /// Run the passes named by `incl` minus those named by `excl`.
    ///
    /// A failed check does not stop later checks, so one run reports every
    /// problem. Annotation passes never run on a program that failed a check.
    pub fn execute_plan(
        &self,
        prog: &mut ir::Program,
        incl: &[String],
        excl: &[String],
    ) -> PassResult<()> {
        let mut errors = Vec::new();
        for (name, pass) in self.plan(incl, excl)? {
            if pass.stage == Stage::Annotate && !errors.is_empty() {
                log::info!("{name}: not run because checks failed");
                break;
            }
            let start = Instant::now();
            let outcome = (pass.run)(prog);
            log::info!("{name}: {}ms", start.elapsed().as_millis());
            match outcome {
                Ok(diag) => errors.extend(diag.finish(name)),
                Err(err) => {
                    errors.push(err);
                    break;
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}
