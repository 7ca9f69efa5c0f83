// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Splits the report table into two consecutive halves:
//   - Training set: the first `train_ratio` of the reports
//   - Test set:     everything after it
//
// No shuffling. The report table is exported in commit order,
// and the test reports must come after the training reports so
// the model is evaluated on bugs "from the future".
//
// Split size: floor(len × train_ratio), e.g. 10 reports at 0.8
// → 8 train, 2 test.
//
// Reference: Rust Book §8 (Vectors)

/// Split `items` into (head, tail) with `floor(len * train_ratio)`
/// items in the head. Order is preserved.
pub fn split_train_test<T>(mut items: Vec<T>, train_ratio: f64) -> (Vec<T>, Vec<T>) {
    let total    = items.len();
    let split_at = ((total as f64) * train_ratio).floor() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let test = items.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} test ({}% / {}%)",
        items.len(),
        test.len(),
        (items.len() * 100) / total.max(1),
        (test.len() * 100) / total.max(1),
    );

    (items, test)
}
