//! file: core/src/lower/lowering_context.rs
//! description: deferred emission queue shared by one lowering run.
//!
//! Function bodies are not lowered where their literal appears. Instead a
//! job is registered here and run once the enclosing pass is over, so every
//! name the body may refer to already has a scope entry. Jobs run
//! last-in-first-out and may register further jobs while draining.
use log::debug;

use super::err::LowerError;

pub type DeferredJob<'a> = Box<dyn FnOnce(&mut LoweringContext<'a>) -> Result<(), LowerError> + 'a>;

#[derive(Default)]
pub struct LoweringContext<'a> {
    jobs: Vec<DeferredJob<'a>>,
}

impl<'a> LoweringContext<'a> {
    pub fn new() -> Self {
        LoweringContext { jobs: Vec::new() }
    }

    pub fn defer(&mut self, job: impl FnOnce(&mut LoweringContext<'a>) -> Result<(), LowerError> + 'a) {
        self.jobs.push(Box::new(job));
    }

    pub fn pending(&self) -> usize {
        self.jobs.len()
    }

    /// Runs queued jobs until none are left, including jobs registered by
    /// jobs. Returns how many ran.
    pub fn drain(&mut self) -> Result<usize, LowerError> {
        let mut ran = 0;
        while let Some(job) = self.jobs.pop() {
            job(self)?;
            ran += 1;
        }
        debug!("deferred queue drained after {} job(s)", ran);
        Ok(ran)
    }
}
