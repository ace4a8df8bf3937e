use hls_utils::Error;

/// Problems found by a checking pass. Errors fail the plan once every
/// requested check has run; warnings are only logged.
#[derive(Default, Debug)]
pub struct Diagnostics {
    errors: Vec<Error>,
    warnings: Vec<Error>,
}

impl Diagnostics {
    pub fn err(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn warning(&mut self, warning: Error) {
        self.warnings.push(warning);
    }

    pub fn num_errors(&self) -> usize {
        self.errors.len()
    }

    /// Log the warnings under the target `pass` and hand back the errors.
    pub fn finish(self, pass: &str) -> Vec<Error> {
        for warning in &self.warnings {
            log::warn!(target: pass, "{warning}");
        }
        self.errors
    }
}

/// A pass whose result is a set of [Diagnostics] rather than a changed
/// program.
pub trait DiagnosticPass {
    fn take_diagnostics(&mut self) -> Diagnostics;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_keeps_errors_only() {
        let mut diag = Diagnostics::default();
        diag.warning(Error::misc("unread channel"));
        diag.err(Error::malformed_structure("bad call"));
        assert_eq!(diag.num_errors(), 1);
        let errors = diag.finish("test");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("bad call"));
    }
}
