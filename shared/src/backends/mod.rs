cfg_if! {
    if #[cfg(all(target_arch = "wasm32", feature = "wbindgen"))] {
        mod wasm_bindgen;
        pub use self::wasm_bindgen::perf_clock::PerfClock;
    } else {
        mod native;
        pub use self::native::perf_clock::PerfClock;
    }
}
