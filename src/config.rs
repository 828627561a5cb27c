use crate::names::SyscallNames;
use crate::report::ProfileKind;

/// Where a consolidation run sends its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Overwrite the input file with the report.
    #[default]
    InPlace,
    /// Print the report and leave the input untouched.
    Stdout,
    /// Print the parsed dump as JSON and leave the input untouched.
    /// Needs the `serde` feature.
    Json,
}

/// Options for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    pub profile: ProfileKind,
    pub output: OutputMode,
    /// Most syscall names kept resolved at once.
    pub syscall_cache_capacity: usize,
}

impl Config {
    #[must_use]
    pub const fn with_profile(mut self, profile: ProfileKind) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub const fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub const fn with_syscall_cache_capacity(mut self, capacity: usize) -> Self {
        self.syscall_cache_capacity = capacity;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: ProfileKind::Auto,
            output: OutputMode::InPlace,
            syscall_cache_capacity: SyscallNames::<crate::names::Ausyscall>::DEFAULT_CAPACITY,
        }
    }
}
