//! Lexical extraction of function, class, and branching counts.
//!
//! This is pattern matching, not parsing. Multi-line signatures are missed and
//! macro invocations or `return call(...);` statements that look like
//! declarations are counted. Branch keywords inside comments and string
//! literals count too. These are accepted approximations.

use std::sync::LazyLock;

use regex::Regex;

use crate::decode::decode_source;
use crate::domain::FileMetrics;

static FUNCTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(?:virtual\s+)?(?:static\s+)?(?:inline\s+)?(?:\w+\s+)+\w+\s*\([^)]*\)\s*(?:const\s*)?(?:override\s*)?[{;]",
    )
    .expect("valid function regex")
});

static CLASS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*class\s+\w+").expect("valid class regex"));

static BRANCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:if|for|while|switch)\s*\(").expect("valid branch regex")
});

/// Extract metrics from already-decoded text.
pub fn extract(path: &str, content: &str) -> FileMetrics {
    FileMetrics {
        path: path.to_string(),
        line_count: content.lines().count(),
        function_count: FUNCTION_PATTERN.find_iter(content).count(),
        class_count: CLASS_PATTERN.find_iter(content).count(),
        complexity_count: BRANCH_PATTERN.find_iter(content).count(),
    }
}

/// Extract metrics from raw file bytes. Binary or undecodable content
/// yields zero metrics.
pub fn extract_bytes(path: &str, bytes: &[u8]) -> FileMetrics {
    match decode_source(bytes) {
        Some(content) => extract(path, &content),
        None => {
            log::warn!("skipping undecodable or binary file {path}");
            FileMetrics::empty(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{extract, extract_bytes};

    const SENSOR_CPP: &str = r#"#include "Sensor.h"

class Sensor : public ISensor {
public:
    virtual float read() const override;
    static int count(int a, int b);
};

float Sensor::read() const {
    return 0.0f;
}

int compute(int value) {
    if (value > 10) {
        for (int i = 0; i < value; ++i) {
            while(busy()) {}
        }
    }
    switch (value) {
    default:
        break;
    }
    return value;
}
"#;

    #[test]
    fn counts_lines_functions_classes_and_branches() {
        let metrics = extract("src/Sensor.cpp", SENSOR_CPP);
        assert_eq!(metrics.path, "src/Sensor.cpp");
        assert_eq!(metrics.line_count, 24);
        // read, count, compute; `Sensor::read` is not matched.
        assert_eq!(metrics.function_count, 3);
        assert_eq!(metrics.class_count, 1);
        assert_eq!(metrics.complexity_count, 4);
    }

    #[test]
    fn control_statements_are_not_functions() {
        let metrics = extract("a.cpp", "if (x) {\n}\nwhile (y) {\n}\n");
        assert_eq!(metrics.function_count, 0);
        assert_eq!(metrics.complexity_count, 2);
    }

    #[test]
    fn branch_keywords_need_word_boundary() {
        let metrics = extract("a.cpp", "elif(x); notify(y); format(z); if(a);");
        assert_eq!(metrics.complexity_count, 1);
    }

    #[test]
    fn comments_still_count_as_branches() {
        let metrics = extract("a.cpp", "// if (legacy) remove\n");
        assert_eq!(metrics.complexity_count, 1);
    }

    #[test]
    fn indented_class_declarations_count() {
        let metrics = extract(
            "a.h",
            "namespace hw {\n  class Hal;\n  enum class Mode { A };\n}\n",
        );
        assert_eq!(metrics.class_count, 1);
    }

    #[test]
    fn empty_content_yields_zero() {
        let metrics = extract("empty.h", "");
        assert_eq!(metrics.line_count, 0);
        assert_eq!(metrics.function_count, 0);
    }

    #[test]
    fn binary_content_yields_zero_metrics() {
        let metrics = extract_bytes("fw.bin", b"\x7fELF\x00\x00if (x) {\n");
        assert_eq!(metrics.line_count, 0);
        assert_eq!(metrics.function_count, 0);
        assert_eq!(metrics.class_count, 0);
        assert_eq!(metrics.complexity_count, 0);
    }

    #[test]
    fn latin1_sources_are_scanned() {
        let metrics = extract_bytes("legacy.cpp", b"// caf\xE9\nint main() {\n}\n");
        assert_eq!(metrics.line_count, 3);
        assert_eq!(metrics.function_count, 1);
    }
}
