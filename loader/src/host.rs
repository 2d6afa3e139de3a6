use std::rc::Rc;

use log::{debug, info, LevelFilter, SetLoggerError};

use tickboot_shared::{Console, ConsoleLogger, FileMap, Manifest, Scheduler};

use crate::{
    config::LoaderConfig,
    error::{LoaderError, RuntimeFault},
    runtime::{
        AssemblyExports, ImportTable, ModuleImports, RuntimeFactory, RuntimeSetup, RuntimeSetupFn,
    },
    sequencer::{BootSequencer, BootState},
};

type NoCallback = fn(&mut dyn AssemblyExports) -> Result<(), RuntimeFault>;

/// The surface a tick-driven host calls into: `init` once, then `tick`
/// once per host tick.
///
/// Console output is suppressed between ticks and flushed at the start of
/// the next one, so it never interleaves with the host's own output.
pub struct HostAdapter {
    manifest: Manifest,
    factory: Box<dyn RuntimeFactory>,
    console: Console,
    scheduler: Scheduler,
    sequencer: BootSequencer,
    imports: ModuleImports,
    setup_fns: Vec<RuntimeSetupFn>,
    tick_index: u64,
}

impl HostAdapter {
    /// Create a new HostAdapter writing to standard output
    pub fn new<F: RuntimeFactory + 'static>(
        manifest: Manifest,
        factory: F,
        config: LoaderConfig,
    ) -> Self {
        Self::with_console(manifest, factory, config, Console::default())
    }

    pub fn with_console<F: RuntimeFactory + 'static>(
        manifest: Manifest,
        factory: F,
        config: LoaderConfig,
        console: Console,
    ) -> Self {
        let console = console.with_prefix(config.console_prefix.clone());
        Self {
            manifest,
            factory: Box::new(factory),
            sequencer: BootSequencer::new(config, console.clone()),
            console,
            scheduler: Scheduler::new(),
            imports: ModuleImports::default(),
            setup_fns: Vec::new(),
            tick_index: 0,
        }
    }

    pub fn set_verbose_logging(&mut self, verbose: bool) {
        self.sequencer.timer_mut().set_verbose(verbose);
    }

    /// Replaces the clock used for stage timings, in milliseconds
    pub fn set_perf_fn<F: Fn() -> f64 + 'static>(&mut self, perf_fn: F) {
        self.sequencer.timer_mut().set_perf_fn(Rc::new(perf_fn));
    }

    /// Registers a function that may adjust the runtime setup just before
    /// the runtime is created. Functions run in registration order.
    pub fn add_custom_runtime_setup_function<F: FnMut(&mut RuntimeSetup) + 'static>(
        &mut self,
        setup_fn: F,
    ) {
        self.setup_fns.push(Box::new(setup_fn));
    }

    pub fn set_module_imports(&mut self, module_name: impl Into<String>, imports: ImportTable) {
        self.imports.set(module_name, imports);
    }

    /// Decodes the manifest and starts creating the runtime. Manifest errors
    /// are returned; runtime faults surface from the next `tick`.
    pub fn init(&mut self) -> Result<(), LoaderError> {
        let state = self.sequencer.state();
        if state != BootState::Unstarted {
            return Err(LoaderError::InvalidState {
                operation: "init",
                state,
            });
        }

        self.console.set_suppressed(false);
        let result = self.start();
        self.console.set_suppressed(true);
        result
    }

    fn start(&mut self) -> Result<(), LoaderError> {
        self.sequencer.decode_manifest(&self.manifest)?;

        let mut setup = self.runtime_setup();
        for setup_fn in self.setup_fns.iter_mut() {
            setup_fn(&mut setup);
        }

        self.sequencer
            .create_runtime(self.factory.as_mut(), &mut self.scheduler, &setup);
        info!("Runtime creation started, state: {}", self.sequencer.state());
        Ok(())
    }

    fn runtime_setup(&self) -> RuntimeSetup {
        let config = self.sequencer.config().runtime.clone();
        let root = format!("{}/", config.assembly_root.trim_end_matches('/'));
        let assemblies = self
            .sequencer
            .files()
            .map(|files| {
                files
                    .paths()
                    .filter(|path| path.starts_with(&root))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        RuntimeSetup {
            config,
            imports: self.imports.clone(),
            assemblies,
        }
    }

    /// One host tick without per-tick managed code. See [`HostAdapter::tick_with`].
    pub fn tick(&mut self) -> Result<(), LoaderError> {
        self.tick_inner(None::<NoCallback>)
    }

    /// One host tick: flushes queued console output, advances the scheduler
    /// once, moves startup forward and, once running, calls `callback` with
    /// the entry assembly's exports. A fault recorded since the last tick is
    /// returned once that work is done.
    pub fn tick_with<F>(&mut self, callback: F) -> Result<(), LoaderError>
    where
        F: FnOnce(&mut dyn AssemblyExports) -> Result<(), RuntimeFault>,
    {
        self.tick_inner(Some(callback))
    }

    fn tick_inner<F>(&mut self, callback: Option<F>) -> Result<(), LoaderError>
    where
        F: FnOnce(&mut dyn AssemblyExports) -> Result<(), RuntimeFault>,
    {
        self.console.set_suppressed(false);
        let result = self.run_tick(callback);
        self.console.set_suppressed(true);
        result
    }

    fn run_tick<F>(&mut self, callback: Option<F>) -> Result<(), LoaderError>
    where
        F: FnOnce(&mut dyn AssemblyExports) -> Result<(), RuntimeFault>,
    {
        self.tick_index += 1;
        let pending = self.sequencer.take_pending_error();

        let state = self.sequencer.state();
        if state == BootState::Unstarted {
            return Err(LoaderError::InvalidState {
                operation: "tick",
                state,
            });
        }

        if self.sequencer.barrier().release() {
            info!("Tick barrier released on tick {}", self.tick_index);
        }
        self.scheduler.advance();
        self.sequencer.pump();

        if self.sequencer.state() == BootState::AwaitingTickBarrier {
            debug!("Runtime still starting on tick {}", self.tick_index);
        }
        if let Some(callback) = callback {
            self.sequencer.run_tick(callback);
        }

        match pending {
            Some(fault) => Err(LoaderError::Pending(fault)),
            None => Ok(()),
        }
    }

    /// True once the entry point has run without faulting
    pub fn ready(&self) -> bool {
        matches!(
            self.sequencer.state(),
            BootState::Running | BootState::Completed
        )
    }

    pub fn state(&self) -> BootState {
        self.sequencer.state()
    }

    pub fn exports(&mut self) -> Option<&mut (dyn AssemblyExports + 'static)> {
        self.sequencer.exports()
    }

    pub fn files(&self) -> Option<&FileMap> {
        self.sequencer.files()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Routes the `log` facade into this adapter's console at `level`, so
    /// library logging is prefixed and suppressed between ticks like the
    /// console's own output. The logger is process-global and can be
    /// installed only once.
    pub fn install_logger(&self, level: LevelFilter) -> Result<(), SetLoggerError> {
        ConsoleLogger::init(self.console.clone(), level)
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn sequencer(&self) -> &BootSequencer {
        &self.sequencer
    }

    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }
}
