use std::{fmt, rc::Rc};

use log::{debug, info};

use tickboot_shared::{Console, FileMap, Manifest, ManifestDecoder, ManifestError, Scheduler};

use crate::{
    barrier::TickBarrier,
    config::{EntryMode, LoaderConfig},
    error::RuntimeFault,
    fetch::ResourceFetcher,
    profile::StageTimer,
    runtime::{AssemblyExports, ManagedRuntime, RuntimeEnv, RuntimeFactory, RuntimeSetup},
    symbols::SymbolMap,
};

/// Startup progress, in the order the states are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BootState {
    Unstarted,
    ManifestDecoded,
    RuntimeCreating,
    AwaitingTickBarrier,
    RuntimeReady,
    ExportsResolved,
    Running,
    Completed,
    Faulted,
}

impl fmt::Display for BootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootState::Unstarted => "unstarted",
            BootState::ManifestDecoded => "manifest decoded",
            BootState::RuntimeCreating => "creating the runtime",
            BootState::AwaitingTickBarrier => "waiting for the next tick",
            BootState::RuntimeReady => "runtime ready",
            BootState::ExportsResolved => "exports resolved",
            BootState::Running => "running",
            BootState::Completed => "completed",
            BootState::Faulted => "faulted",
        };
        f.write_str(name)
    }
}

/// Drives the embedded runtime from a decoded manifest to a running entry
/// point, one step per host tick.
///
/// Faults never escape as panics or errors from the stepping methods; they
/// move the sequencer to [`BootState::Faulted`], are logged with a
/// symbol-translated stack, and wait in [`BootSequencer::take_pending_error`]
/// until the host next pumps.
pub struct BootSequencer {
    state: BootState,
    config: LoaderConfig,
    console: Console,
    timer: StageTimer,
    barrier: TickBarrier,
    files: Option<Rc<FileMap>>,
    symbols: SymbolMap,
    runtime: Option<Box<dyn ManagedRuntime>>,
    exports: Option<Box<dyn AssemblyExports>>,
    pending_error: Option<RuntimeFault>,
}

impl BootSequencer {
    pub fn new(config: LoaderConfig, console: Console) -> Self {
        let mut timer = StageTimer::default();
        timer.set_verbose(config.verbose_logging);
        Self {
            state: BootState::Unstarted,
            config,
            console,
            timer,
            barrier: TickBarrier::new(),
            files: None,
            symbols: SymbolMap::default(),
            runtime: None,
            exports: None,
            pending_error: None,
        }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn barrier(&self) -> &TickBarrier {
        &self.barrier
    }

    pub fn timer(&self) -> &StageTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut StageTimer {
        &mut self.timer
    }

    pub fn files(&self) -> Option<&FileMap> {
        self.files.as_deref()
    }

    pub fn symbols(&self) -> &SymbolMap {
        &self.symbols
    }

    pub fn exports(&mut self) -> Option<&mut (dyn AssemblyExports + 'static)> {
        self.exports.as_deref_mut()
    }

    pub fn has_pending_error(&self) -> bool {
        self.pending_error.is_some()
    }

    /// Hands over the recorded fault, if any. Each fault is returned once.
    pub fn take_pending_error(&mut self) -> Option<RuntimeFault> {
        self.pending_error.take()
    }

    /// Unstarted -> ManifestDecoded
    pub fn decode_manifest(&mut self, manifest: &Manifest) -> Result<(), ManifestError> {
        let files = self
            .timer
            .measure(&self.console, "Decoded manifest", || {
                ManifestDecoder::decode(manifest.entries())
            })?;

        if let Some(symbols_path) = &self.config.symbols_path {
            if let Some(bytes) = files.get(symbols_path) {
                self.symbols = SymbolMap::parse(&String::from_utf8_lossy(bytes));
                debug!("Loaded {} symbols from '{}'", self.symbols.len(), symbols_path);
            }
        }

        self.files = Some(Rc::new(files));
        self.state = BootState::ManifestDecoded;
        Ok(())
    }

    /// ManifestDecoded -> RuntimeCreating -> AwaitingTickBarrier
    pub fn create_runtime(
        &mut self,
        factory: &mut dyn RuntimeFactory,
        scheduler: &mut Scheduler,
        setup: &RuntimeSetup,
    ) {
        let Some(files) = self.files.clone() else {
            return;
        };
        self.state = BootState::RuntimeCreating;

        let env = RuntimeEnv {
            fetcher: ResourceFetcher::new(files),
            scheduler,
            barrier: self.barrier.clone(),
            setup,
            console: self.console.clone(),
        };
        let created = self
            .timer
            .measure(&self.console, "Created runtime", || factory.create(env));

        match created {
            Ok(runtime) => {
                self.runtime = Some(runtime);
                // startup continues on a later tick even if the runtime
                // finished its pre-run phase without asking for it
                self.barrier.raise();
                self.state = BootState::AwaitingTickBarrier;
            }
            Err(fault) => self.fault(fault),
        }
    }

    /// Moves startup forward as far as the current tick allows.
    pub fn pump(&mut self) {
        if self.state != BootState::AwaitingTickBarrier || self.barrier.is_raised() {
            return;
        }
        let ready = self
            .runtime
            .as_ref()
            .is_some_and(|runtime| runtime.is_ready());
        if !ready {
            return;
        }
        self.state = BootState::RuntimeReady;
        info!("Runtime ready");

        if let Err(fault) = self.resolve_exports() {
            self.fault(fault);
            return;
        }
        self.state = BootState::ExportsResolved;

        if let Err(fault) = self.run_entry_point() {
            self.fault(fault);
            return;
        }
        self.state = match self.config.entry_mode {
            EntryMode::PerTick => BootState::Running,
            EntryMode::RunToCompletion => BootState::Completed,
        };
    }

    /// Runs per-tick managed code against the resolved exports. A fault is
    /// recorded for the next tick but leaves the sequencer running.
    pub fn run_tick<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut dyn AssemblyExports) -> Result<(), RuntimeFault>,
    {
        if self.state != BootState::Running {
            return;
        }
        let Some(exports) = self.exports.as_deref_mut() else {
            return;
        };
        if let Err(fault) = callback(exports) {
            self.report(&fault);
            self.pending_error = Some(fault);
        }
    }

    fn resolve_exports(&mut self) -> Result<(), RuntimeFault> {
        let runtime = self
            .runtime
            .as_mut()
            .ok_or_else(|| RuntimeFault::new("Runtime is missing after startup"))?;
        let assembly = self.config.entry_assembly.as_str();
        let exports = self.timer.measure(&self.console, "Resolved exports", || {
            runtime.assembly_exports(assembly)
        })?;
        self.exports = Some(exports);
        Ok(())
    }

    fn run_entry_point(&mut self) -> Result<(), RuntimeFault> {
        let exports = self
            .exports
            .as_deref_mut()
            .ok_or_else(|| RuntimeFault::new("Exports are missing after resolution"))?;
        let method = self.config.entry_method.as_str();
        self.timer
            .measure(&self.console, "Ran entry point", || exports.invoke(method))
    }

    fn fault(&mut self, fault: RuntimeFault) {
        self.report(&fault);
        self.state = BootState::Faulted;
        self.pending_error = Some(fault);
    }

    fn report(&self, fault: &RuntimeFault) {
        self.console.error(fault.message());
        if let Some(stack) = fault.stack() {
            self.console.error(self.symbols.translate_stack(stack));
        }
    }
}

impl fmt::Debug for BootSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootSequencer")
            .field("state", &self.state)
            .field("barrier", &self.barrier.is_raised())
            .field("pending_error", &self.pending_error)
            .finish_non_exhaustive()
    }
}
