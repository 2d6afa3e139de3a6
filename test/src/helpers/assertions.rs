/// Assert that the sink captured exactly these console lines, in order
#[macro_export]
macro_rules! assert_console_lines {
    ($sink:expr, [$($line:expr),* $(,)?]) => {
        let expected: Vec<String> = vec![$($line.to_string()),*];
        assert_eq!($sink.lines(), expected, "unexpected console output");
    };
}

/// Assert that some captured console line contains the given text
#[macro_export]
macro_rules! assert_console_contains {
    ($sink:expr, $needle:expr) => {
        let lines = $sink.lines();
        assert!(
            lines.iter().any(|line| line.contains($needle)),
            "no console line contains {:?}, got {:#?}",
            $needle,
            lines
        );
    };
}
