use std::{cell::Cell, rc::Rc};

use serde_json::Value;

use tickboot_loader::{BootState, ImportTable, LoaderError};
use tickboot_test::{
    assert_console_contains, assert_console_lines, FakeRuntimeFactory, ManifestBuilder, TestHost,
};

fn app_host() -> TestHost {
    let manifest = ManifestBuilder::new()
        .assembly("App", b"app")
        .assembly("Lib", b"library")
        .file("./config.json", br#"{"tickRate":20}"#)
        .build();
    TestHost::new(manifest, FakeRuntimeFactory::new())
}

#[test]
fn console_output_between_ticks_is_held_back() {
    let mut test = app_host();
    test.host.init().unwrap();
    assert_console_lines!(test.sink, ["Loaded 2 assemblies"]);
    assert!(test.host.console().is_suppressed());

    test.host.console().log("written between ticks");
    test.host.console().warn("still between ticks");
    assert_eq!(test.host.console().queued(), 2);
    assert_console_lines!(test.sink, ["Loaded 2 assemblies"]);

    let console = test.host.console().clone();
    test.host
        .tick_with(move |_| {
            console.log("inside the tick");
            Ok(())
        })
        .unwrap();
    assert_console_lines!(
        test.sink,
        [
            "Loaded 2 assemblies",
            "written between ticks",
            "WARN: still between ticks",
            "inside the tick",
        ]
    );
    assert!(test.host.console().is_suppressed());
}

#[test]
fn prefix_is_applied_to_every_line() {
    let manifest = ManifestBuilder::new().assembly("App", b"app").build();
    let mut config = TestHost::config();
    config.console_prefix = "TICKBOOT ".to_string();
    let mut test = TestHost::with_config(manifest, FakeRuntimeFactory::new(), config);

    test.host.init().unwrap();
    test.host.console().error("late");
    test.host.tick().unwrap();
    assert_console_lines!(test.sink, ["TICKBOOT Loaded 1 assemblies", "TICKBOOT ERROR: late"]);
}

#[test]
fn verbose_logging_times_each_stage() {
    let mut test = app_host();
    let clock = Rc::new(Cell::new(0.0));
    let ticking = clock.clone();
    test.host.set_perf_fn(move || {
        ticking.set(ticking.get() + 1.5);
        ticking.get()
    });
    test.host.set_verbose_logging(true);

    test.host.init().unwrap();
    test.host.tick().unwrap();
    assert_console_lines!(
        test.sink,
        [
            "Decoded manifest in 1.50 ms",
            "Loaded 2 assemblies",
            "Created runtime in 1.50 ms",
            "Resolved exports in 1.50 ms",
            "Ran entry point in 1.50 ms",
        ]
    );
    assert_eq!(clock.get(), 12.0);
}

#[test]
fn setup_functions_run_in_order_before_creation() {
    let mut test = app_host();
    test.host.add_custom_runtime_setup_function(|setup| setup.config.debug_level = 1);
    test.host.add_custom_runtime_setup_function(|setup| {
        setup.config.debug_level *= 5;
        setup.assemblies.retain(|path| path != "managed/Lib.dll");
    });

    test.host.init().unwrap();
    assert_eq!(test.probe.debug_level(), 5);
    assert_eq!(test.probe.fetched(), vec![("managed/App.dll".to_string(), 3)]);
}

#[test]
fn module_imports_reach_the_runtime() {
    let mut test = app_host();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    test.host.set_module_imports(
        "game/utils",
        ImportTable::new()
            .with("getCpu", move |_| {
                counter.set(counter.get() + 1);
                Value::from(12.5)
            })
            .with("echo", |args| args.first().cloned().unwrap_or(Value::Null)),
    );
    test.host.set_module_imports("game/empty", ImportTable::new());

    test.host.init().unwrap();
    let imports = test.probe.imports();
    let modules: Vec<&str> = imports.module_names().collect();
    assert_eq!(modules, vec!["game/empty", "game/utils"]);
    assert_eq!(imports.call("game/utils", "getCpu", &[]), Some(Value::from(12.5)));
    assert_eq!(
        imports.call("game/utils", "echo", &[Value::from("hi")]),
        Some(Value::from("hi"))
    );
    assert_eq!(imports.call("game/utils", "missing", &[]), None);
    assert_eq!(calls.get(), 1);
}

#[test]
fn fetching_a_missing_file_is_a_404() {
    let mut test = app_host();
    test.host.add_custom_runtime_setup_function(|setup| {
        setup.assemblies.push("managed/Missing.dll".to_string())
    });

    test.host.init().unwrap();
    assert_eq!(test.host.state(), BootState::Faulted);
    assert_console_contains!(test.sink, "ERROR: Failed to load 'managed/Missing.dll': status 404");

    match test.host.tick() {
        Err(LoaderError::Pending(fault)) => assert!(fault.message().contains("404")),
        other => panic!("expected a pending fault, got {:?}", other),
    }
}

#[test]
fn decoded_files_stay_available() {
    let mut test = app_host();
    test.host.init().unwrap();
    test.host.tick().unwrap();

    let files = test.host.files().unwrap();
    let paths: Vec<&str> = files.paths().collect();
    assert_eq!(paths, vec!["config.json", "managed/App.dll", "managed/Lib.dll"]);

    let config: Value = serde_json::from_slice(files.get("./config.json").unwrap()).unwrap();
    assert_eq!(config["tickRate"], 20);
}

#[test]
fn installed_logger_writes_through_the_console() {
    let manifest = ManifestBuilder::new().assembly("App", b"app").build();
    let mut config = TestHost::config();
    config.console_prefix = "TICKBOOT ".to_string();
    let mut test = TestHost::with_config(manifest, FakeRuntimeFactory::new(), config);
    test.host.install_logger(log::LevelFilter::Info).unwrap();

    test.host.init().unwrap();
    assert_console_contains!(test.sink, "TICKBOOT Decoded 1 manifest entries");

    assert_eq!(test.tick_until_ready(10), Some(1));
    assert_console_contains!(test.sink, "TICKBOOT Tick barrier released on tick 1");

    log::info!("logged between ticks");
    assert!(!test
        .sink
        .lines()
        .iter()
        .any(|line| line.contains("logged between ticks")));
    test.host.tick().unwrap();
    assert_console_contains!(test.sink, "TICKBOOT logged between ticks");
}
