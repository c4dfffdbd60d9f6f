use std::time::{Duration, Instant};

/// Run `f` and emit a `performance` warning if it took longer than `max`.
pub fn warn_if_slow<F, T>(label: &'static str, max: Duration, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_us = elapsed.as_micros() as u64,
            max_us = max.as_micros() as u64,
            "slow operation detected"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_closure_output() {
        let v = warn_if_slow("sum", Duration::from_secs(1), || 2 + 2);
        assert_eq!(v, 4);
    }
}
