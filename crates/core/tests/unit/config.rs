//! # Configuration Tests
//!
//! Parsing of the line-oriented configuration file, JSON loading and range
//! validation.

use ossim_core::config::{Config, ConfigError, ConfigField, LogTarget, SchedulingPolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::{Path, PathBuf};

const SAMPLE: &str = "\
Start Simulator Configuration File:
Version/Phase: 3.0
File Path: Test_3.mdf
CPU Scheduling Code: SJF-N
Quantum Time (cycles): 3
Memory Available (KB): 12000
Processor Cycle Time (msec): 10
I/O Cycle Time (msec): 20
Log To: Both
Log File Path: logfile_1.lgf
End Simulator Configuration File.
";

fn with_line(prompt: &str, value: &str) -> String {
    SAMPLE
        .lines()
        .map(|line| {
            if line.starts_with(&format!("{prompt}:")) {
                format!("{prompt}: {value}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ══════════════════════════════════════════════════════════
// 1. Text format
// ══════════════════════════════════════════════════════════

#[test]
fn test_parse_sample_file() {
    let config = Config::parse_str(SAMPLE).unwrap();
    assert_eq!(config.version, 3.0);
    assert_eq!(config.metadata_path, PathBuf::from("Test_3.mdf"));
    assert_eq!(config.policy, SchedulingPolicy::SjfN);
    assert_eq!(config.quantum_cycles, 3);
    assert_eq!(config.memory_kb, 12000);
    assert_eq!(config.process_cycle_ms, 10);
    assert_eq!(config.io_cycle_ms, 20);
    assert_eq!(config.log_to, LogTarget::Both);
    assert_eq!(config.log_path, PathBuf::from("logfile_1.lgf"));
}

#[test]
fn test_data_lines_in_any_order() {
    let mut lines: Vec<&str> = SAMPLE.lines().collect();
    lines[1..10].reverse();
    let config = Config::parse_str(&lines.join("\n")).unwrap();
    assert_eq!(config, Config::parse_str(SAMPLE).unwrap());
}

#[rstest]
#[case("NONE", SchedulingPolicy::FcfsN)]
#[case("fcfs-n", SchedulingPolicy::FcfsN)]
#[case("SJF-N", SchedulingPolicy::SjfN)]
#[case("srtf-p", SchedulingPolicy::SrtfP)]
#[case("FCFS-P", SchedulingPolicy::FcfsP)]
#[case("RR-P", SchedulingPolicy::RrP)]
fn test_scheduling_codes(#[case] code: &str, #[case] expected: SchedulingPolicy) {
    let config = Config::parse_str(&with_line("CPU Scheduling Code", code)).unwrap();
    assert_eq!(config.policy, expected);
}

#[rstest]
#[case("monitor", LogTarget::Monitor)]
#[case("File", LogTarget::File)]
#[case("BOTH", LogTarget::Both)]
fn test_log_targets(#[case] code: &str, #[case] expected: LogTarget) {
    let config = Config::parse_str(&with_line("Log To", code)).unwrap();
    assert_eq!(config.log_to, expected);
}

// ══════════════════════════════════════════════════════════
// 2. Malformed files
// ══════════════════════════════════════════════════════════

#[test]
fn test_missing_start_descriptor() {
    let text = SAMPLE.replacen("Start Simulator", "Begin Simulator", 1);
    assert!(matches!(
        Config::parse_str(&text),
        Err(ConfigError::CorruptDescriptor)
    ));
}

#[test]
fn test_missing_line_is_incomplete() {
    let text: String = SAMPLE
        .lines()
        .filter(|l| !l.starts_with("Log To"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(matches!(
        Config::parse_str(&text),
        Err(ConfigError::IncompleteFile)
    ));
}

#[test]
fn test_missing_end_descriptor_is_incomplete() {
    let text = SAMPLE.replace("End Simulator Configuration File.", "");
    assert!(matches!(
        Config::parse_str(&text),
        Err(ConfigError::IncompleteFile)
    ));
}

#[test]
fn test_unknown_prompt() {
    let text = SAMPLE.replace("Log To:", "Log Into:");
    match Config::parse_str(&text) {
        Err(ConfigError::CorruptPrompt(prompt)) => assert_eq!(prompt, "Log Into"),
        other => panic!("expected CorruptPrompt, got {other:?}"),
    }
}

#[test]
fn test_duplicate_prompt() {
    let text = SAMPLE.replace(
        "Log To: Both",
        "Log To: Both\nQuantum Time (cycles): 4",
    );
    assert!(matches!(
        Config::parse_str(&text),
        Err(ConfigError::DuplicatePrompt(ConfigField::QuantumCycles))
    ));
}

#[rstest]
#[case("Version/Phase", "10.5", ConfigField::Version)]
#[case("Quantum Time (cycles)", "101", ConfigField::QuantumCycles)]
#[case("Memory Available (KB)", "102401", ConfigField::MemoryAvailable)]
#[case("Memory Available (KB)", "-1", ConfigField::MemoryAvailable)]
#[case("Processor Cycle Time (msec)", "0", ConfigField::ProcessCycleTime)]
#[case("Processor Cycle Time (msec)", "1001", ConfigField::ProcessCycleTime)]
#[case("I/O Cycle Time (msec)", "10001", ConfigField::IoCycleTime)]
#[case("CPU Scheduling Code", "LOTTERY", ConfigField::SchedulingCode)]
#[case("Log To", "Printer", ConfigField::LogTo)]
fn test_out_of_range(#[case] prompt: &str, #[case] value: &str, #[case] field: ConfigField) {
    match Config::parse_str(&with_line(prompt, value)) {
        Err(ConfigError::DataOutOfRange { field: got, .. }) => assert_eq!(got, field),
        other => panic!("expected DataOutOfRange for {prompt}, got {other:?}"),
    }
}

#[test]
fn test_non_numeric_value() {
    assert!(matches!(
        Config::parse_str(&with_line("I/O Cycle Time (msec)", "fast")),
        Err(ConfigError::InvalidValue {
            field: ConfigField::IoCycleTime,
            ..
        })
    ));
}

#[rstest]
#[case("Quantum Time (cycles)", "0")]
#[case("Quantum Time (cycles)", "100")]
#[case("Memory Available (KB)", "102400")]
#[case("Processor Cycle Time (msec)", "1")]
#[case("I/O Cycle Time (msec)", "10000")]
#[case("Version/Phase", "0.0")]
#[case("Version/Phase", "10.0")]
fn test_range_bounds_are_inclusive(#[case] prompt: &str, #[case] value: &str) {
    assert!(Config::parse_str(&with_line(prompt, value)).is_ok());
}

// ══════════════════════════════════════════════════════════
// 3. JSON and helpers
// ══════════════════════════════════════════════════════════

#[test]
fn test_json_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_json_rejects_out_of_range() {
    let err = Config::from_json(r#"{ "io_cycle_ms": 0 }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::DataOutOfRange {
            field: ConfigField::IoCycleTime,
            ..
        }
    ));
}

#[test]
fn test_json_rejects_unknown_policy() {
    assert!(matches!(
        Config::from_json(r#"{ "policy": "LIFO" }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_resolve_paths_keeps_absolute() {
    let config = Config {
        metadata_path: PathBuf::from("prog.mdf"),
        log_path: PathBuf::from("/var/tmp/out.lgf"),
        ..Config::default()
    }
    .resolve_paths(Path::new("inputs"));
    assert_eq!(config.metadata_path, PathBuf::from("inputs/prog.mdf"));
    assert_eq!(config.log_path, PathBuf::from("/var/tmp/out.lgf"));
}

#[test]
fn test_log_header_names_policy() {
    let config = Config::parse_str(SAMPLE).unwrap();
    let header = config.log_header_lines();
    assert!(header.iter().any(|l| l.ends_with(": SJF-N")));
    assert!(header.iter().any(|l| l.ends_with(": Test_3.mdf")));
}
