use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use tickboot_loader::{
    AssemblyExports, ManagedRuntime, ModuleImports, RuntimeEnv, RuntimeFactory, RuntimeFault,
    TickBarrier,
};
use tickboot_shared::{CallbackResult, Scheduler};

/// What a fake runtime saw and did, shared with the test that built it
#[derive(Default)]
pub struct ProbeLog {
    /// Assemblies fetched during creation, with their sizes
    pub fetched: Vec<(String, usize)>,
    /// `assembly::method` for every invocation, in order
    pub invocations: Vec<String>,
    pub debug_level: i32,
    pub imports: ModuleImports,
    pub creations: u32,
}

#[derive(Clone, Default)]
pub struct FakeProbe {
    log: Rc<RefCell<ProbeLog>>,
}

impl FakeProbe {
    pub fn fetched(&self) -> Vec<(String, usize)> {
        self.log.borrow().fetched.clone()
    }

    pub fn invocations(&self) -> Vec<String> {
        self.log.borrow().invocations.clone()
    }

    pub fn debug_level(&self) -> i32 {
        self.log.borrow().debug_level
    }

    pub fn imports(&self) -> ModuleImports {
        self.log.borrow().imports.clone()
    }

    pub fn creations(&self) -> u32 {
        self.log.borrow().creations
    }
}

/// A stand-in for the embedded runtime. It loads every assembly the setup
/// lists through the fetch shim, then finishes starting up on later ticks.
pub struct FakeRuntimeFactory {
    startup_ticks: u32,
    create_fault: Option<RuntimeFault>,
    method_faults: Rc<HashMap<String, RuntimeFault>>,
    probe: FakeProbe,
}

impl FakeRuntimeFactory {
    pub fn new() -> Self {
        Self {
            startup_ticks: 0,
            create_fault: None,
            method_faults: Rc::new(HashMap::new()),
            probe: FakeProbe::default(),
        }
    }

    /// Extra ticks the runtime waits on the barrier after the first one
    pub fn startup_ticks(mut self, ticks: u32) -> Self {
        self.startup_ticks = ticks;
        self
    }

    pub fn fail_create(mut self, fault: RuntimeFault) -> Self {
        self.create_fault = Some(fault);
        self
    }

    /// Makes every invocation of `method` fail with `fault`
    pub fn fail_method(mut self, method: &str, fault: RuntimeFault) -> Self {
        Rc::make_mut(&mut self.method_faults).insert(method.to_string(), fault);
        self
    }

    pub fn probe(&self) -> FakeProbe {
        self.probe.clone()
    }
}

impl Default for FakeRuntimeFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn continue_startup(
    scheduler: &mut Scheduler,
    barrier: TickBarrier,
    ready: Rc<Cell<bool>>,
    remaining: u32,
) {
    scheduler.set_timeout(0, move |scheduler| -> CallbackResult {
        if remaining == 0 {
            ready.set(true);
        } else {
            barrier.raise();
            continue_startup(scheduler, barrier.clone(), ready.clone(), remaining - 1);
        }
        Ok(())
    });
}

impl RuntimeFactory for FakeRuntimeFactory {
    fn create(&mut self, env: RuntimeEnv<'_>) -> Result<Box<dyn ManagedRuntime>, RuntimeFault> {
        self.probe.log.borrow_mut().creations += 1;
        if let Some(fault) = self.create_fault.clone() {
            return Err(fault);
        }

        for path in &env.setup.assemblies {
            let response = env.fetcher.fetch(path).into_inner();
            if !response.ok() {
                return Err(RuntimeFault::new(format!(
                    "Failed to load '{}': status {}",
                    path,
                    response.status()
                )));
            }
            let size = response.array_buffer().len();
            self.probe.log.borrow_mut().fetched.push((path.clone(), size));
        }

        {
            let mut log = self.probe.log.borrow_mut();
            log.debug_level = env.setup.config.debug_level;
            log.imports = env.setup.imports.clone();
        }
        env.console
            .log(format!("Loaded {} assemblies", env.setup.assemblies.len()));

        let ready = Rc::new(Cell::new(false));
        env.barrier.raise();
        continue_startup(
            env.scheduler,
            env.barrier.clone(),
            ready.clone(),
            self.startup_ticks,
        );

        Ok(Box::new(FakeRuntime {
            ready,
            method_faults: self.method_faults.clone(),
            probe: self.probe.clone(),
        }))
    }
}

struct FakeRuntime {
    ready: Rc<Cell<bool>>,
    method_faults: Rc<HashMap<String, RuntimeFault>>,
    probe: FakeProbe,
}

impl ManagedRuntime for FakeRuntime {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn assembly_exports(&mut self, assembly: &str) -> Result<Box<dyn AssemblyExports>, RuntimeFault> {
        let path = format!("managed/{assembly}.dll");
        let loaded = self
            .probe
            .fetched()
            .iter()
            .any(|(fetched, _)| fetched.trim_start_matches("./") == path);
        if !loaded {
            return Err(RuntimeFault::new(format!(
                "Could not find assembly '{}'",
                assembly
            )));
        }

        Ok(Box::new(FakeExports {
            assembly: assembly.to_string(),
            method_faults: self.method_faults.clone(),
            probe: self.probe.clone(),
        }))
    }
}

struct FakeExports {
    assembly: String,
    method_faults: Rc<HashMap<String, RuntimeFault>>,
    probe: FakeProbe,
}

impl AssemblyExports for FakeExports {
    fn invoke(&mut self, method: &str) -> Result<(), RuntimeFault> {
        self.probe
            .log
            .borrow_mut()
            .invocations
            .push(format!("{}::{}", self.assembly, method));
        match self.method_faults.get(method) {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }
}
