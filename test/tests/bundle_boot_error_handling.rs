use std::fs;

use proptest::prelude::*;

use tickboot_bundler::{Bundler, BundlerConfig, OutputFormat, MONO_CONFIG_FILE};
use tickboot_loader::BootState;
use tickboot_shared::{Encoding, Manifest};
use tickboot_test::{FakeRuntimeFactory, TestHost};

const MONO_CONFIG: &str = r#"{
  "mainAssemblyName": "App.dll",
  "assemblyRootFolder": "managed",
  "assets": [
    { "behavior": "assembly", "name": "App.dll" },
    { "behavior": "assembly", "name": "System.Private.CoreLib.dll" },
    { "behavior": "dotnetwasm", "name": "dotnet.native.wasm" },
    { "behavior": "symbols", "name": "dotnet.native.js.symbols" }
  ]
}"#;

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

fn write_app_bundle(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("managed")).unwrap();
    fs::write(dir.join(MONO_CONFIG_FILE), MONO_CONFIG).unwrap();
    fs::write(dir.join("managed/App.dll"), b"MZ app".repeat(100)).unwrap();
    fs::write(
        dir.join("managed/System.Private.CoreLib.dll"),
        (0..=255u8).cycle().take(70_000).collect::<Vec<u8>>(),
    )
    .unwrap();
    fs::write(dir.join("dotnet.native.wasm"), b"\0asm\x01\0\0\0").unwrap();
}

#[test]
fn bundled_app_boots() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    write_app_bundle(dir.path());

    for encoding in [Encoding::Base64, Encoding::Base32768] {
        let config = BundlerConfig {
            encoding,
            format: OutputFormat::Json,
            ..BundlerConfig::default()
        };
        let bundle = Bundler::new(config).unwrap().bundle_dir(dir.path()).unwrap();
        let path = bundle.write_to(dir.path(), OutputFormat::Json).unwrap();

        let manifest = Manifest::from_json(&fs::read_to_string(path).unwrap()).unwrap();
        let mut test = TestHost::new(manifest, FakeRuntimeFactory::new());
        test.host.init().unwrap();
        assert_eq!(test.tick_until_ready(3), Some(1));
        assert_eq!(test.host.state(), BootState::Running);

        let fetched = test.probe.fetched();
        assert_eq!(
            fetched,
            vec![
                ("managed/App.dll".to_string(), 600),
                ("managed/System.Private.CoreLib.dll".to_string(), 70_000),
            ]
        );
        assert!(test.host.files().unwrap().contains("dotnet.native.wasm"));
    }
}

#[test]
fn unbundled_entry_assembly_faults() {
    let dir = tempfile::tempdir().unwrap();
    write_app_bundle(dir.path());
    let bundle = Bundler::new(BundlerConfig::default())
        .unwrap()
        .bundle_dir(dir.path())
        .unwrap();

    let mut config = TestHost::config();
    config.entry_assembly = "Game".to_string();
    let mut test = TestHost::with_config(bundle.manifest, FakeRuntimeFactory::new(), config);
    test.host.init().unwrap();
    test.host.tick().unwrap();
    assert_eq!(test.host.state(), BootState::Faulted);
    assert!(test.host.tick().is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_assembly_survives_bundling(
        bytes in proptest::collection::vec(any::<u8>(), 0..4096),
        base32768 in any::<bool>(),
        compress in any::<bool>(),
        level in 0u32..=9,
    ) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("managed")).unwrap();
        fs::write(
            dir.path().join(MONO_CONFIG_FILE),
            r#"{"assets":[{"behavior":"assembly","name":"App.dll"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("managed/App.dll"), &bytes).unwrap();

        let config = BundlerConfig {
            encoding: if base32768 { Encoding::Base32768 } else { Encoding::Base64 },
            compress,
            level,
            ..BundlerConfig::default()
        };
        let bundle = Bundler::new(config).unwrap().bundle_dir(dir.path()).unwrap();
        let module = bundle.render(OutputFormat::Module).unwrap();
        prop_assert!(module.starts_with("export const manifest = ["));

        let files = bundle.manifest.decode().unwrap();
        prop_assert_eq!(files.get("managed/App.dll"), Some(&bytes[..]));
    }
}
