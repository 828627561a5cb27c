mod util;

use bpfreport::{ProfileKind, SyscallNames, TraceDump};
use criterion::{Criterion, criterion_group, criterion_main};

fn no_syscalls(_: u64) -> Option<String> {
    None
}

fn parse(c: &mut Criterion) {
    util::init_tracing();

    c.bench_function("parse khugepaged fixture", |b| {
        let input = std::include_str!("../tests/fixtures/khugepaged.txt");
        b.iter(|| TraceDump::parse(input));
    });

    let mut group = c.benchmark_group("parse synthetic dump");
    for threads in [16usize, 256, 1024] {
        let input = util::synthetic_dump(threads);
        group.throughput(criterion::Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(threads),
            &input,
            |b, input| b.iter(|| TraceDump::parse(input)),
        );
    }
    group.finish();
}

fn render(c: &mut Criterion) {
    util::init_tracing();

    let dump = TraceDump::parse(&util::synthetic_dump(256));
    for profile in [ProfileKind::Kthread, ProfileKind::Generic] {
        c.bench_function(&format!("render {profile}"), |b| {
            let mut names = SyscallNames::new(no_syscalls as fn(u64) -> Option<String>);
            b.iter(|| profile.render(&dump, &mut names));
        });
    }

    c.bench_function("render page-alloc fixture", |b| {
        let dump = TraceDump::parse(std::include_str!("../tests/fixtures/page_alloc.txt"));
        let mut names = SyscallNames::new(no_syscalls as fn(u64) -> Option<String>);
        b.iter(|| ProfileKind::PageAlloc.render(&dump, &mut names).to_string());
    });
}

criterion_group!(benches, parse, render);
criterion_main!(benches);
