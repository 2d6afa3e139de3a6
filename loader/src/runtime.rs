use std::{collections::BTreeMap, fmt, rc::Rc};

use serde_json::Value;

use tickboot_shared::{Console, Scheduler};

use crate::{barrier::TickBarrier, config::RuntimeConfig, error::RuntimeFault, fetch::ResourceFetcher};

/// A host function callable from managed code
pub type ImportFn = Rc<dyn Fn(&[Value]) -> Value>;

/// Named host functions exposed under one module name.
#[derive(Clone, Default)]
pub struct ImportTable {
    functions: BTreeMap<String, ImportFn>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        self.insert(name, function);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        self.functions.insert(name.into(), Rc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&ImportFn> {
        self.functions.get(name)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Option<Value> {
        self.functions.get(name).map(|function| function(args))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for ImportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}

/// Import tables keyed by module name. Setting a module twice replaces it.
#[derive(Debug, Clone, Default)]
pub struct ModuleImports {
    modules: BTreeMap<String, ImportTable>,
}

impl ModuleImports {
    pub fn set(&mut self, module_name: impl Into<String>, imports: ImportTable) {
        self.modules.insert(module_name.into(), imports);
    }

    pub fn get(&self, module_name: &str) -> Option<&ImportTable> {
        self.modules.get(module_name)
    }

    pub fn call(&self, module_name: &str, function: &str, args: &[Value]) -> Option<Value> {
        self.modules.get(module_name)?.call(function, args)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

/// Everything the runtime is configured with, open to custom setup
/// functions before construction starts.
#[derive(Debug, Clone, Default)]
pub struct RuntimeSetup {
    pub config: RuntimeConfig,
    pub imports: ModuleImports,
    /// Assemblies to load, as manifest paths
    pub assemblies: Vec<String>,
}

pub type RuntimeSetupFn = Box<dyn FnMut(&mut RuntimeSetup)>;

/// What a runtime gets to work with while it is being constructed.
pub struct RuntimeEnv<'a> {
    pub fetcher: ResourceFetcher,
    pub scheduler: &'a mut Scheduler,
    pub barrier: TickBarrier,
    pub setup: &'a RuntimeSetup,
    pub console: Console,
}

/// Builds the embedded runtime.
///
/// `create` runs the runtime's synchronous pre-run phase. A runtime that
/// needs more ticks to start raises the barrier and schedules its own
/// continuation on the scheduler.
pub trait RuntimeFactory {
    fn create(&mut self, env: RuntimeEnv<'_>) -> Result<Box<dyn ManagedRuntime>, RuntimeFault>;
}

pub trait ManagedRuntime {
    /// True once startup has finished and exports may be requested
    fn is_ready(&self) -> bool;

    fn assembly_exports(&mut self, assembly: &str) -> Result<Box<dyn AssemblyExports>, RuntimeFault>;
}

/// Exported entry points of one managed assembly
pub trait AssemblyExports {
    fn invoke(&mut self, method: &str) -> Result<(), RuntimeFault>;
}
