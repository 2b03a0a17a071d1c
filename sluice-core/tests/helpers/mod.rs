use tracing_subscriber::EnvFilter;

/// Letters with one duplicate, the smallest interesting seed sequence.
pub fn letters() -> Vec<String> {
    ["A", "B", "B", "C"].into_iter().map(String::from).collect()
}

/// Nested word lists used to exercise flattening.
pub fn word_lists() -> Vec<Vec<String>> {
    vec![
        vec!["Hi", "i'm", "Carlos"],
        vec!["I", "like", "soda", "and", "pizza"],
        vec!["Goodbye"],
    ]
    .into_iter()
    .map(|words| words.into_iter().map(String::from).collect())
    .collect()
}

/// Unordered numbers used to exercise sorting and extremal terminals.
pub fn unsorted_numbers() -> Vec<i64> {
    vec![12, 5, 62, 34, 2, 156, 58, 88, 7, 26]
}

/// Installs a subscriber honouring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
