//! Human-readable names for the small integer codes kernel tracepoints emit.

use crate::HashMap;
use crate::tracing;
use std::collections::VecDeque;
use std::process::Command;

/// A fixed code-to-name table with a fallback for codes it does not know.
#[derive(Debug, Clone, Copy)]
pub struct NameTable {
    names: &'static [&'static str],
    fallback_prefix: &'static str,
}

impl NameTable {
    #[must_use]
    pub const fn new(names: &'static [&'static str], fallback_prefix: &'static str) -> Self {
        Self {
            names,
            fallback_prefix,
        }
    }

    /// Name for a numeric code, if the table has one.
    #[must_use]
    pub fn get(&self, code: u64) -> Option<&'static str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.names.get(idx))
            .copied()
    }

    /// Name for a code as it appears in a map key.
    ///
    /// Never fails: unknown or non-numeric codes render as the fallback
    /// prefix followed by the raw code, e.g. `UNKNOWN_42`.
    #[must_use]
    pub fn name(&self, code: &str) -> String {
        code.trim()
            .parse::<u64>()
            .ok()
            .and_then(|c| self.get(c))
            .map_or_else(
                || format!("{}{}", self.fallback_prefix, code.trim()),
                str::to_string,
            )
    }

    /// Name for a code, or the code itself when it is not in the table.
    #[must_use]
    pub fn name_or_code(&self, code: &str) -> String {
        code.trim()
            .parse::<u64>()
            .ok()
            .and_then(|c| self.get(c))
            .map_or_else(|| code.trim().to_string(), str::to_string)
    }
}

/// khugepaged `SCAN_*` result codes, from `include/trace/events/huge_memory.h`.
pub const SCAN_STATUS: NameTable = NameTable::new(
    &[
        "FAIL",
        "SUCCEED",
        "PMD_NULL",
        "PMD_NONE",
        "PMD_MAPPED",
        "EXCEED_NONE_PTE",
        "EXCEED_SWAP_PTE",
        "EXCEED_SHARED_PTE",
        "PTE_NON_PRESENT",
        "PTE_UFFD_WP",
        "PTE_MAPPED_HUGEPAGE",
        "PAGE_RO",
        "LACK_REFERENCED_PAGE",
        "PAGE_NULL",
        "SCAN_ABORT",
        "PAGE_COUNT",
        "PAGE_LRU",
        "PAGE_LOCK",
        "PAGE_ANON",
        "PAGE_COMPOUND",
        "ANY_PROCESS",
        "VMA_NULL",
        "VMA_CHECK",
        "ADDRESS_RANGE",
        "DEL_PAGE_LRU",
        "ALLOC_HUGE_PAGE_FAIL",
        "CGROUP_CHARGE_FAIL",
        "TRUNCATED",
        "PAGE_HAS_PRIVATE",
        "STORE_FAILED",
        "COPY_MC",
        "PAGE_FILLED",
    ],
    "UNKNOWN_",
);

/// Buddy allocator migratetypes, from `include/linux/mmzone.h`.
pub const MIGRATETYPE: NameTable = NameTable::new(
    &[
        "UNMOVABLE",
        "MOVABLE",
        "RECLAIMABLE",
        "HIGHATOMIC",
        "CMA",
        "ISOLATE",
    ],
    "TYPE_",
);

/// Source of syscall names by number.
pub trait SyscallResolver {
    /// The syscall's name, or `None` if it cannot be resolved.
    fn resolve(&self, nr: u64) -> Option<String>;
}

/// Resolves syscall numbers with the audit package's `ausyscall --exact`.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Ausyscall;

impl SyscallResolver for Ausyscall {
    fn resolve(&self, nr: u64) -> Option<String> {
        let output = Command::new("ausyscall")
            .arg("--exact")
            .arg(nr.to_string())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                (!name.is_empty()).then_some(name)
            }
            Ok(output) => {
                tracing::debug!(nr, status = %output.status, "ausyscall could not resolve");
                None
            }
            Err(err) => {
                tracing::debug!(nr, %err, "ausyscall unavailable");
                None
            }
        }
    }
}

impl<F> SyscallResolver for F
where
    F: Fn(u64) -> Option<String>,
{
    fn resolve(&self, nr: u64) -> Option<String> {
        self(nr)
    }
}

/// Memoized syscall names with a bounded number of entries.
///
/// Built once per run and handed to whatever needs names. When full, the
/// oldest entry is evicted. Numbers the resolver cannot name render as
/// `syscall_<nr>`, and that fallback is cached too.
#[derive(Debug)]
pub struct SyscallNames<R> {
    resolver: R,
    capacity: usize,
    cache: HashMap<u64, String>,
    order: VecDeque<u64>,
}

impl<R: SyscallResolver> SyscallNames<R> {
    pub const DEFAULT_CAPACITY: usize = 1024;

    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self::with_capacity(resolver, Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(resolver: R, capacity: usize) -> Self {
        Self {
            resolver,
            capacity,
            cache: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// The name for syscall `nr`.
    pub fn name(&mut self, nr: u64) -> String {
        if let Some(name) = self.cache.get(&nr) {
            return name.clone();
        }

        let name = self
            .resolver
            .resolve(nr)
            .unwrap_or_else(|| format!("syscall_{nr}"));

        if self.capacity > 0 {
            if self.order.len() >= self.capacity
                && let Some(oldest) = self.order.pop_front()
            {
                self.cache.remove(&oldest);
            }
            self.order.push_back(nr);
            self.cache.insert(nr, name.clone());
        }
        name
    }

    /// Number of cached names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for SyscallNames<Ausyscall> {
    fn default() -> Self {
        Self::new(Ausyscall)
    }
}
