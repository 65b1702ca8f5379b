//! Build-log parsing: memory usage bars, compile status, diagnostics.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{MetricsConfig, ProjectLayout};
use crate::decode::decode_log;
use crate::domain::{BuildMetrics, LogStatus};
use crate::fs::FileSystem;
use crate::test_log::failure_status;

static RAM_USAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RAM:\s+\[.*?\]\s+(\d+\.\d+)%").expect("valid ram regex"));

static FLASH_USAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Flash:\s+\[.*?\]\s+(\d+\.\d+)%").expect("valid flash regex"));

const SUCCESS_TOKEN: &str = "SUCCESS";
const WARNING_TOKEN: &str = "warning:";
const ERROR_TOKEN: &str = "error:";

/// Parse decoded build-log text. Every field is extracted independently;
/// absent fields keep their defaults.
pub fn parse_build_log(text: &str) -> BuildMetrics {
    let metrics = BuildMetrics {
        compilation_success: text.contains(SUCCESS_TOKEN),
        ram_usage_percent: percentage(&RAM_USAGE, text).unwrap_or_default(),
        flash_usage_percent: percentage(&FLASH_USAGE, text).unwrap_or_default(),
        warnings_count: text.matches(WARNING_TOKEN).count(),
        errors_count: text.matches(ERROR_TOKEN).count(),
        log_status: LogStatus::default(),
    };
    log::debug!(
        "build log: success={} ram={}% flash={}% warnings={} errors={}",
        metrics.compilation_success,
        metrics.ram_usage_percent,
        metrics.flash_usage_percent,
        metrics.warnings_count,
        metrics.errors_count
    );
    metrics
}

/// Read and parse the configured build log.
pub fn inspect_build<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
    config: &MetricsConfig,
) -> BuildMetrics {
    log::info!("collecting build metrics");
    match decode_log(fs, &layout.build_log, &config.log_encodings) {
        Ok(decoded) => BuildMetrics {
            log_status: LogStatus::Parsed {
                encoding: decoded.encoding,
            },
            ..parse_build_log(&decoded.text)
        },
        Err(failure) => BuildMetrics {
            log_status: failure_status(failure),
            ..BuildMetrics::default()
        },
    }
}

fn percentage(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{inspect_build, parse_build_log};
    use crate::config::MetricsConfig;
    use crate::decode::Encoding;
    use crate::domain::LogStatus;
    use crate::test_support::{default_layout, mock_tree};

    const PLATFORMIO_LOG: &str = "\
Checking size .pio/build/uno/firmware.elf
RAM:   [=====     ]  45.20% (used 926 bytes from 2048 bytes)
Flash: [===       ]  30.10% (used 9710 bytes from 32256 bytes)
src/main.cpp:12:5: warning: unused variable 'x'
src/hal.cpp:40:1: warning: no return statement
========================= [SUCCESS] Took 3.21 seconds =========================
";

    #[test]
    fn parses_memory_usage_and_status() {
        let metrics = parse_build_log(PLATFORMIO_LOG);
        assert_eq!(metrics.ram_usage_percent, 45.2);
        assert_eq!(metrics.flash_usage_percent, 30.1);
        assert!(metrics.compilation_success);
        assert_eq!(metrics.warnings_count, 2);
        assert_eq!(metrics.errors_count, 0);
    }

    #[test]
    fn fields_are_independent() {
        let metrics = parse_build_log("Flash: [==  ] 12.50%\nmain.cpp:1: error: boom\n");
        assert_eq!(metrics.ram_usage_percent, 0.0);
        assert_eq!(metrics.flash_usage_percent, 12.5);
        assert!(!metrics.compilation_success);
        assert_eq!(metrics.errors_count, 1);
    }

    #[test]
    fn integer_percentages_are_ignored() {
        let metrics = parse_build_log("RAM: [====] 45%");
        assert_eq!(metrics.ram_usage_percent, 0.0);
    }

    #[test]
    fn inspect_build_reads_utf16_logs() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "RAM: [=] 81.00%\r\n[SUCCESS]".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let fs = mock_tree(&[("logs/comfile/compile_results.txt", &bytes)]);

        let metrics = inspect_build(&fs, &default_layout(), &MetricsConfig::default());

        assert_eq!(metrics.ram_usage_percent, 81.0);
        assert!(metrics.compilation_success);
        assert_eq!(
            metrics.log_status,
            LogStatus::Parsed {
                encoding: Encoding::Utf16
            }
        );
    }

    #[test]
    fn inspect_build_without_log_is_zeroed() {
        let fs = mock_tree(&[]);
        let metrics = inspect_build(&fs, &default_layout(), &MetricsConfig::default());
        assert_eq!(metrics.log_status, LogStatus::NotFound);
        assert!(!metrics.compilation_success);
        assert_eq!(metrics.ram_usage_percent, 0.0);
    }
}
