use rand::{Rng, SeedableRng, rngs::StdRng};
use std::fmt::Write;

#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*};
    let filter_layer = tracing_subscriber::EnvFilter::from_default_env();
    let fmt_layer = fmt::Layer::default();

    // a second bench group in the same process finds it already installed
    _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
#[allow(clippy::missing_const_for_fn)]
pub fn init_tracing() {}

const WORKER_POOLS: [&str; 4] = ["kworker", "ksoftirqd", "migration", "rcuc"];

/// A kthread style dump with `threads` threads spread over a few pools,
/// plus syscall latency maps, from a fixed seed so runs are comparable.
pub fn synthetic_dump(threads: usize) -> String {
    let mut rng = StdRng::seed_from_u64(0);
    let mut out = String::from("Attaching 4 probes...\n");

    for idx in 0..threads {
        let pool = WORKER_POOLS[idx % WORKER_POOLS.len()];
        let thread = format!("{pool}/{}:{}", idx / 8, idx % 8);
        _ = writeln!(out, "@invocations[{thread}]:");
        for exp in 10..rng.random_range(12..20) {
            let count = rng.random_range(0..5000u64);
            _ = writeln!(
                out,
                "[{}, {})  {count:>12} |@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@|",
                bpfreport::format_size(1 << exp),
                bpfreport::format_size(1 << (exp + 1))
            );
        }
        out.push('\n');
    }
    for idx in 0..threads {
        let pool = WORKER_POOLS[idx % WORKER_POOLS.len()];
        let ns = rng.random_range(1_000..50_000_000u64);
        _ = writeln!(out, "@total_runtime[{pool}/{}:{}]: {ns}", idx / 8, idx % 8);
    }
    for tid in 0..threads as u64 {
        let nr = rng.random_range(0..16u64);
        let ns = rng.random_range(0..1_000_000u64);
        _ = writeln!(out, "@cns[{nr}, {}]: {ns}", 1000 + tid);
    }
    out
}
