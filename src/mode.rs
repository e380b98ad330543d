//! `CompileMode`: the single configuration surface of the compiler (spec
//! §6). There is no config file, matching the teacher, which also takes all
//! configuration from CLI flags.

use clap::ValueEnum;

use crate::logger::LogMode;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompileMode {
    #[default]
    Optimized,
    Raw,
    Debug,
    #[value(name = "debug_opt")]
    DebugOpt,
    #[value(name = "debug_raw")]
    DebugRaw,
}

impl CompileMode {
    /// Whether indentation auto-close is enabled. `raw` and `debug_raw`
    /// disable it, requiring explicit `end`/`}` closure.
    pub fn auto_close(self) -> bool {
        !matches!(self, CompileMode::Raw | CompileMode::DebugRaw)
    }

    /// Logger verbosity: `debug` is machine-readable, `debug_opt`/`debug_raw`
    /// are human-readable, everything else is silent.
    pub fn log_mode(self) -> LogMode {
        match self {
            CompileMode::Debug => LogMode::Machine,
            CompileMode::DebugOpt | CompileMode::DebugRaw => LogMode::Human,
            CompileMode::Optimized | CompileMode::Raw => LogMode::None,
        }
    }

    /// Downstream `cc` flags (spec §6 table).
    pub fn cc_flags(self) -> &'static [&'static str] {
        match self {
            CompileMode::Optimized => &["-Ofast", "-w"],
            CompileMode::Raw => &["-O1", "-g"],
            CompileMode::Debug => &["-Ofast", "-g"],
            CompileMode::DebugOpt => &["-Ofast", "-g"],
            CompileMode::DebugRaw => &["-O1", "-g"],
        }
    }

    /// All debug modes auto-run the produced binary.
    pub fn auto_run(self) -> bool {
        matches!(
            self,
            CompileMode::Debug | CompileMode::DebugOpt | CompileMode::DebugRaw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_modes_disable_auto_close() {
        assert!(!CompileMode::Raw.auto_close());
        assert!(!CompileMode::DebugRaw.auto_close());
        assert!(CompileMode::Optimized.auto_close());
        assert!(CompileMode::Debug.auto_close());
    }

    #[test]
    fn debug_modes_auto_run() {
        assert!(CompileMode::Debug.auto_run());
        assert!(CompileMode::DebugOpt.auto_run());
        assert!(CompileMode::DebugRaw.auto_run());
        assert!(!CompileMode::Optimized.auto_run());
        assert!(!CompileMode::Raw.auto_run());
    }

    #[test]
    fn log_modes_match_table() {
        assert_eq!(CompileMode::Optimized.log_mode(), LogMode::None);
        assert_eq!(CompileMode::Raw.log_mode(), LogMode::None);
        assert_eq!(CompileMode::Debug.log_mode(), LogMode::Machine);
        assert_eq!(CompileMode::DebugOpt.log_mode(), LogMode::Human);
        assert_eq!(CompileMode::DebugRaw.log_mode(), LogMode::Human);
    }
}
