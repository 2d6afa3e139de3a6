pub mod assertions;
pub mod fake_runtime;
pub mod manifest_builder;
pub mod test_host;

pub use fake_runtime::{FakeProbe, FakeRuntimeFactory};
pub use manifest_builder::ManifestBuilder;
pub use test_host::TestHost;
