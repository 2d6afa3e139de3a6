pub mod perf_clock;
