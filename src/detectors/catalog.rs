//! Built-in source/sink/sanitizer rule catalogs.
//!
//! Rewriting these into a data-driven rule format is out of scope; this is a
//! fixed, in-code catalog per taint category, the same shape the teacher's
//! `TAINT_SOURCES`/`TAINT_SINKS` tables used, compiled once into [`Regex`]es.

use regex::Regex;

/// Vulnerability category a source/sink rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaintCategory {
    SqlInjection,
    CommandInjection,
    Xss,
    Ssrf,
    PathTraversal,
    CodeInjection,
    LogInjection,
}

impl TaintCategory {
    pub fn cwe_id(&self) -> &'static str {
        match self {
            TaintCategory::SqlInjection => "CWE-89",
            TaintCategory::CommandInjection => "CWE-78",
            TaintCategory::Xss => "CWE-79",
            TaintCategory::Ssrf => "CWE-918",
            TaintCategory::PathTraversal => "CWE-22",
            TaintCategory::CodeInjection => "CWE-94",
            TaintCategory::LogInjection => "CWE-117",
        }
    }
}

/// One compiled catalog entry.
pub struct Rule {
    pub pattern: Regex,
    pub rule_name: String,
    pub confidence: f64,
    pub description: String,
}

fn rule(pattern: &str, rule_name: &str, confidence: f64, description: &str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("built-in catalog pattern must compile"),
        rule_name: rule_name.to_string(),
        confidence,
        description: description.to_string(),
    }
}

/// Patterns marking untrusted input entering the program.
pub fn source_rules() -> Vec<Rule> {
    vec![
        rule(
            r"\breq\.(body|query|params)\b",
            "http-request-input",
            0.8,
            "Reads directly from an HTTP request",
        ),
        rule(
            r"\brequest\.(form|args|json|GET|POST)\b",
            "http-request-input",
            0.8,
            "Reads directly from an HTTP request",
        ),
        rule(
            r"\bprocess\.argv\b",
            "cli-argument-input",
            0.6,
            "Reads from command-line arguments",
        ),
        rule(
            r"\b(std::)?env::args\b",
            "cli-argument-input",
            0.6,
            "Reads from command-line arguments",
        ),
        rule(
            r"\bos\.environ\b",
            "environment-variable-input",
            0.5,
            "Reads from an environment variable",
        ),
        rule(
            r"\bread_line\b|\bstdin\b",
            "stdin-input",
            0.5,
            "Reads from standard input",
        ),
    ]
}

/// Patterns marking dangerous uses of (potentially tainted) data, grouped by
/// the category they would be reported under if unsanitized.
pub fn sink_rules() -> Vec<(TaintCategory, Vec<Rule>)> {
    vec![
        (
            TaintCategory::SqlInjection,
            vec![
                rule(
                    r#"execute\(\s*["']?\s*SELECT"#,
                    "sql-string-concat-select",
                    0.7,
                    "SQL query built via string concatenation",
                ),
                rule(
                    r"\bcursor\.execute\(.*%.*\)",
                    "sql-percent-format",
                    0.6,
                    "SQL query built with %-formatting",
                ),
            ],
        ),
        (
            TaintCategory::CommandInjection,
            vec![
                rule(
                    r"\b(os\.system|subprocess\.(call|run|Popen))\(",
                    "shell-exec",
                    0.7,
                    "Executes a shell command",
                ),
                rule(
                    r"\bstd::process::Command::new\(",
                    "shell-exec",
                    0.6,
                    "Spawns a subprocess",
                ),
            ],
        ),
        (
            TaintCategory::Xss,
            vec![rule(
                r"\binnerHTML\s*=|\bdangerouslySetInnerHTML\b",
                "unescaped-html-sink",
                0.7,
                "Writes unescaped content into the DOM",
            )],
        ),
        (
            TaintCategory::Ssrf,
            vec![rule(
                r"\b(requests\.get|ureq::get|fetch)\(",
                "outbound-request",
                0.5,
                "Makes an outbound HTTP request with a caller-controlled URL",
            )],
        ),
        (
            TaintCategory::PathTraversal,
            vec![rule(
                r"\b(open|File::open|fs::read)\(",
                "file-open-sink",
                0.5,
                "Opens a file path that may be caller-controlled",
            )],
        ),
        (
            TaintCategory::CodeInjection,
            vec![rule(
                r"\beval\(|\bexec\(",
                "dynamic-eval",
                0.8,
                "Evaluates a string as code",
            )],
        ),
        (
            TaintCategory::LogInjection,
            vec![rule(
                r"\b(log|logger)\.(info|warn|error|debug)\(",
                "unsanitized-log-write",
                0.3,
                "Writes caller-controlled data to a log sink",
            )],
        ),
    ]
}

/// Patterns marking functions known to neutralize tainted input.
pub fn sanitizer_rules() -> Vec<Rule> {
    vec![
        rule(
            r"\bescape(_html|_sql)?\(|\bhtml\.escape\(",
            "escape-function",
            0.7,
            "Escapes special characters before use",
        ),
        rule(
            r"\bsanitize\w*\(",
            "sanitize-function",
            0.6,
            "Explicit sanitizer call",
        ),
        rule(
            r"\bparameterize\(|\bprepare\(|\bbind_param\(",
            "parameterized-query",
            0.8,
            "Uses a parameterized query instead of string concatenation",
        ),
        rule(
            r"\bshlex\.quote\(|\bshell_escape\(",
            "shell-quote",
            0.7,
            "Quotes a string before passing it to a shell",
        ),
    ]
}
