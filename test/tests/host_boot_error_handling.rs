use std::{cell::Cell, rc::Rc};

use tickboot_loader::{BootState, EntryMode, LoaderConfig, LoaderError, RuntimeFault};
use tickboot_shared::{Encoding, ManifestEntry, ManifestError, Payload};
use tickboot_test::{assert_console_lines, FakeRuntimeFactory, ManifestBuilder, TestHost};

fn app_manifest() -> ManifestBuilder {
    ManifestBuilder::new()
        .assembly("App", &b"MZ app assembly".repeat(32))
        .file("./dotnet.native.js.symbols", b"7:App_Tick\n8:App_Boot\n")
}

#[test]
fn init_leaves_runtime_waiting_for_the_next_tick() {
    let mut test = TestHost::new(app_manifest().build(), FakeRuntimeFactory::new());

    test.host.init().unwrap();
    assert_eq!(test.host.state(), BootState::AwaitingTickBarrier);
    assert!(!test.host.ready());
    assert!(test.host.sequencer().barrier().is_raised());
    assert!(test.probe.invocations().is_empty());

    test.host.tick().unwrap();
    assert!(test.host.ready());
    assert_eq!(test.host.state(), BootState::Running);
    assert_eq!(test.probe.invocations(), vec!["App::Main"]);
    assert_eq!(test.probe.fetched(), vec![("managed/App.dll".to_string(), 15 * 32)]);
}

#[test]
fn slow_startup_takes_one_tick_per_barrier() {
    let mut test = TestHost::new(
        app_manifest().build(),
        FakeRuntimeFactory::new().startup_ticks(3),
    );
    test.host.init().unwrap();

    assert_eq!(test.tick_until_ready(10), Some(4));
    assert_eq!(test.host.tick_index(), 4);
    assert_eq!(test.probe.creations(), 1);
}

#[test]
fn tick_callback_runs_only_while_running() {
    let mut test = TestHost::new(
        app_manifest().build(),
        FakeRuntimeFactory::new().startup_ticks(1),
    );
    test.host.init().unwrap();

    for _ in 0..4 {
        test.host.tick_with(|exports| exports.invoke("Loop")).unwrap();
    }
    // tick 1 still waits; tick 2 starts the app and runs the first loop
    assert_eq!(
        test.probe.invocations(),
        vec!["App::Main", "App::Loop", "App::Loop", "App::Loop"]
    );
}

#[test]
fn run_to_completion_skips_tick_callbacks() {
    let config = LoaderConfig {
        entry_mode: EntryMode::RunToCompletion,
        ..TestHost::config()
    };
    let mut test = TestHost::with_config(app_manifest().build(), FakeRuntimeFactory::new(), config);
    test.host.init().unwrap();

    test.host.tick_with(|exports| exports.invoke("Loop")).unwrap();
    test.host.tick_with(|exports| exports.invoke("Loop")).unwrap();
    assert_eq!(test.host.state(), BootState::Completed);
    assert!(test.host.ready());
    assert_eq!(test.probe.invocations(), vec!["App::Main"]);
}

#[test]
fn tick_fault_is_raised_on_the_following_tick() {
    let fault = RuntimeFault::new("loop failed").with_stack("at wasm-function[7]:0x2a");
    let mut test = TestHost::new(
        app_manifest().build(),
        FakeRuntimeFactory::new().fail_method("Loop", fault.clone()),
    );
    test.host.init().unwrap();
    test.host.tick().unwrap();
    test.sink.clear();

    // the failing tick itself completes
    test.host.tick_with(|exports| exports.invoke("Loop")).unwrap();
    assert_console_lines!(test.sink, ["ERROR: loop failed", "ERROR: at App_Tick:0x2a"]);

    assert_eq!(test.host.tick(), Err(LoaderError::Pending(fault)));
    // raised once, and the runtime keeps going
    assert_eq!(test.host.tick(), Ok(()));
    assert_eq!(test.host.state(), BootState::Running);
}

#[test]
fn tick_that_raises_a_fault_still_does_its_work() {
    let mut test = TestHost::new(app_manifest().build(), FakeRuntimeFactory::new());
    test.host.init().unwrap();
    test.host.tick().unwrap();

    let fired = Rc::new(Cell::new(0));
    let timer_fired = fired.clone();
    test.host.scheduler_mut().set_interval(1, move |_| {
        timer_fired.set(timer_fired.get() + 1);
        Ok(())
    });

    let fault = RuntimeFault::new("loop failed");
    let failing = fault.clone();
    test.host.tick_with(move |_| Err(failing)).unwrap();
    assert_eq!(fired.get(), 1);

    let called = Rc::new(Cell::new(false));
    let callback_ran = called.clone();
    let result = test.host.tick_with(move |_| {
        callback_ran.set(true);
        Ok(())
    });
    assert_eq!(result, Err(LoaderError::Pending(fault)));
    assert_eq!(fired.get(), 2);
    assert!(called.get());
    assert_eq!(test.host.tick(), Ok(()));
}

#[test]
fn creation_fault_stops_startup() {
    let fault =
        RuntimeFault::new("boom").with_stack("at wasm-function[8]:0x10\nat wasm-function[99]:0x1");
    let mut test = TestHost::new(
        app_manifest().build(),
        FakeRuntimeFactory::new().fail_create(fault.clone()),
    );

    test.host.init().unwrap();
    assert_eq!(test.host.state(), BootState::Faulted);
    assert_console_lines!(
        test.sink,
        ["ERROR: boom", "ERROR: at App_Boot:0x10\nat wasm-function[99]:0x1"]
    );

    assert_eq!(test.host.tick(), Err(LoaderError::Pending(fault)));
    for _ in 0..3 {
        assert_eq!(test.host.tick(), Ok(()));
    }
    assert!(!test.host.ready());
}

#[test]
fn missing_entry_assembly_faults_on_first_tick() {
    let config = LoaderConfig {
        entry_assembly: "Game".to_string(),
        ..TestHost::config()
    };
    let mut test = TestHost::with_config(app_manifest().build(), FakeRuntimeFactory::new(), config);
    test.host.init().unwrap();

    test.host.tick().unwrap();
    assert_eq!(test.host.state(), BootState::Faulted);

    match test.host.tick() {
        Err(LoaderError::Pending(fault)) => {
            assert_eq!(fault.message(), "Could not find assembly 'Game'")
        }
        other => panic!("expected a pending fault, got {:?}", other),
    }
}

#[test]
fn entry_point_fault() {
    let mut test = TestHost::new(
        app_manifest().build(),
        FakeRuntimeFactory::new().fail_method("Main", RuntimeFault::new("Main threw")),
    );
    test.host.init().unwrap();
    test.host.tick().unwrap();

    assert_eq!(test.host.state(), BootState::Faulted);
    assert!(test.host.exports().is_some());
    assert!(matches!(test.host.tick(), Err(LoaderError::Pending(_))));
}

#[test]
fn tick_before_init_is_rejected() {
    let mut test = TestHost::new(app_manifest().build(), FakeRuntimeFactory::new());
    assert_eq!(
        test.host.tick(),
        Err(LoaderError::InvalidState {
            operation: "tick",
            state: BootState::Unstarted
        })
    );
}

#[test]
fn init_runs_once() {
    let mut test = TestHost::new(app_manifest().build(), FakeRuntimeFactory::new());
    test.host.init().unwrap();
    assert_eq!(
        test.host.init(),
        Err(LoaderError::InvalidState {
            operation: "init",
            state: BootState::AwaitingTickBarrier
        })
    );
    assert_eq!(test.probe.creations(), 1);
}

#[test]
fn corrupt_manifest_fails_init() {
    let manifest = app_manifest().build();
    let mut entries = manifest.entries().to_vec();
    entries.push(ManifestEntry::new(
        "./bad.bin",
        Payload::Base64("SGV*".to_string()),
        Default::default(),
    ));
    let mut test = TestHost::new(entries.into(), FakeRuntimeFactory::new());

    match test.host.init() {
        Err(LoaderError::Manifest(ManifestError::Decode { path, .. })) => {
            assert_eq!(path, "./bad.bin")
        }
        other => panic!("expected a decode error, got {:?}", other),
    }
    assert_eq!(test.host.state(), BootState::Unstarted);
    assert_eq!(test.probe.creations(), 0);
}

#[test]
fn base32768_manifest_boots_too() {
    let manifest = ManifestBuilder::new()
        .encoding(Encoding::Base32768)
        .assembly("App", b"base32768 assembly")
        .build();
    let mut test = TestHost::new(manifest, FakeRuntimeFactory::new());
    test.host.init().unwrap();
    assert_eq!(test.tick_until_ready(2), Some(1));
    assert_eq!(
        test.host.files().and_then(|files| files.get("managed/App.dll")),
        Some(&b"base32768 assembly"[..])
    );
}
