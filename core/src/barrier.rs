//! Thread-backed boundaries: detached execution and fan-out with join.

use std::io;
use std::thread::{self, Builder};

use bulwark_config::BarrierConfig;
use bulwark_types::{Fault, FaultSet};

use crate::boundary::run_catching;
use crate::hook;

/// A boxed unit of work, for fanning out closures of different types.
pub type Work<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Box a closure as a [`Work`].
pub fn work<'a>(work: impl FnOnce() + Send + 'a) -> Work<'a> {
    Box::new(work)
}

/// Executor for boundaries that start their own threads.
///
/// Threads are named and sized from [`BarrierConfig`]. The free functions
/// [`spawn_catching`] and [`run_all_catching`] use `Barrier::default()`.
#[derive(Debug, Clone, Default)]
pub struct Barrier {
    config: BarrierConfig,
}

impl Barrier {
    /// Settings that would make a spawn panic are replaced, see
    /// [`BarrierConfig::sanitized`].
    #[must_use]
    pub fn new(config: BarrierConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// Build from the config file and environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BarrierConfig::load())
    }

    #[must_use]
    pub fn config(&self) -> &BarrierConfig {
        &self.config
    }

    /// Install the quiet panic hook when the config asks for it.
    ///
    /// Returns whether the hook is now installed.
    pub fn install_hooks(&self) -> bool {
        if self.config.quiet_guards {
            hook::install_quiet_hook();
        }
        hook::is_quiet_hook_installed()
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::new();
        if let Some(name) = &self.config.thread_name {
            builder = builder.name(name.clone());
        }
        if let Some(size) = self.config.stack_size {
            builder = builder.stack_size(size);
        }
        builder
    }

    /// Run `work` on a new detached thread under [`run_catching`].
    ///
    /// Returns once the thread has started. A fault raised by `work` is
    /// absorbed and reported only as a `tracing` debug event. The error
    /// case is the operating system refusing to start the thread.
    pub fn spawn_catching<F>(&self, work: F) -> io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.builder().spawn(move || {
            if let Err(fault) = run_catching(work) {
                tracing::debug!(
                    fault = %fault,
                    location = ?fault.location(),
                    "Detached unit of work faulted"
                );
            }
        })?;
        Ok(())
    }

    /// Run every unit of work on its own thread and wait for all of them.
    ///
    /// Returns `Ok(())` when none faulted. Otherwise every captured fault is
    /// returned, tagged with and ordered by the launch index of its unit.
    /// A unit whose thread could not be started contributes a
    /// [`FaultKind::Spawn`](bulwark_types::FaultKind::Spawn) fault; units
    /// already started are still joined.
    ///
    /// Units may borrow from the caller's stack. There is no timeout: a unit
    /// that never returns blocks this call forever.
    pub fn run_all_catching<I, F>(&self, works: I) -> Result<(), FaultSet>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() + Send,
    {
        fan_out(works, |_| self.builder())
    }
}

fn fan_out<I, F, B>(works: I, builder_for: B) -> Result<(), FaultSet>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() + Send,
    B: Fn(usize) -> Builder,
{
    let faults = thread::scope(|scope| {
        let mut faults = Vec::new();
        let mut handles = Vec::new();

        for (index, work) in works.into_iter().enumerate() {
            match builder_for(index).spawn_scoped(scope, move || run_catching(work)) {
                Ok(handle) => handles.push((index, handle)),
                Err(err) => {
                    tracing::debug!(index, error = %err, "Failed to start unit of work");
                    faults.push((index, Fault::spawn(err)));
                }
            }
        }

        for (index, handle) in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(fault)) => faults.push((index, fault)),
                Err(payload) => faults.push((index, Fault::from_panic(payload))),
            }
        }

        faults
    });

    match FaultSet::from_indexed(faults) {
        Some(set) => Err(set),
        None => Ok(()),
    }
}

/// [`Barrier::spawn_catching`] with the default configuration.
pub fn spawn_catching<F>(work: F) -> io::Result<()>
where
    F: FnOnce() + Send + 'static,
{
    Barrier::default().spawn_catching(work)
}

/// [`Barrier::run_all_catching`] with the default configuration.
pub fn run_all_catching<I, F>(works: I) -> Result<(), FaultSet>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() + Send,
{
    Barrier::default().run_all_catching(works)
}

/// Fan out closures of different types with [`run_all_catching`].
///
/// ```
/// # use bulwark_core::run_all_catching;
/// let result = run_all_catching![|| {}, || panic!("second")];
/// let faults = result.unwrap_err();
/// assert_eq!(faults.indices().collect::<Vec<_>>(), vec![1]);
/// ```
#[macro_export]
macro_rules! run_all_catching {
    ($($work:expr),* $(,)?) => {{
        let works: ::std::vec::Vec<$crate::Work<'_>> =
            ::std::vec![$($crate::work($work)),*];
        $crate::run_all_catching(works)
    }};
}
