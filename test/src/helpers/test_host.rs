use tickboot_loader::{HostAdapter, LoaderConfig};
use tickboot_shared::{Console, Manifest, MemorySink};

use super::{FakeProbe, FakeRuntimeFactory};

/// A host adapter wired to a fake runtime, with console output captured
pub struct TestHost {
    pub host: HostAdapter,
    pub sink: MemorySink,
    pub probe: FakeProbe,
}

impl TestHost {
    pub fn new(manifest: Manifest, factory: FakeRuntimeFactory) -> Self {
        Self::with_config(manifest, factory, Self::config())
    }

    pub fn with_config(
        manifest: Manifest,
        factory: FakeRuntimeFactory,
        config: LoaderConfig,
    ) -> Self {
        let sink = MemorySink::new();
        let probe = factory.probe();
        let host = HostAdapter::with_console(manifest, factory, config, Console::new(sink.clone()));
        Self { host, sink, probe }
    }

    /// Default loader config with an empty console prefix, so captured lines
    /// can be compared directly
    pub fn config() -> LoaderConfig {
        LoaderConfig {
            console_prefix: String::new(),
            ..LoaderConfig::default()
        }
    }

    /// Ticks until the host reports ready, returning how many ticks it took
    pub fn tick_until_ready(&mut self, max_ticks: u32) -> Option<u32> {
        for tick in 1..=max_ticks {
            if self.host.tick().is_err() {
                return None;
            }
            if self.host.ready() {
                return Some(tick);
            }
        }
        None
    }
}
