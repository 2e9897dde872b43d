use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One validation finding reported against a submitted discovery model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryProblem {
    /// Logical path of the offending value, e.g. `discoveryModel.name`.
    pub path: String,
    /// Fallback path used when `path` has no recorded position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Human-readable message.
    pub error: String,
}

/// Outcome of submitting a discovery model for validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryValidation {
    pub success: bool,
    pub problems: Vec<DiscoveryProblem>,
}

impl DiscoveryValidation {
    pub fn valid() -> Self {
        Self {
            success: true,
            problems: vec![],
        }
    }

    pub fn invalid(problems: Vec<DiscoveryProblem>) -> Self {
        Self {
            success: false,
            problems,
        }
    }
}

/// Source position of a value in a serialized document.
///
/// `line` is 1-based, `column` is a 0-based character offset within the line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Marker kind understood by the editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Error,
}

/// Editor marker tying a message to a zero-based row and a column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Annotation {
    pub row: usize,
    pub column: usize,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub text: String,
}

/// Pass/fail state of a test case. A case that has not run has no status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// `meta` block of a test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestCaseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TestStatus>,
    /// Fields not modelled here, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single test case. `@id` is assumed to be unique across all specifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(default)]
    pub meta: TestCaseMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestCase {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: TestCaseMeta::default(),
            extra: Map::new(),
        }
    }

    pub fn status(&self) -> Option<TestStatus> {
        self.meta.status
    }
}

/// Named group of test cases, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestSpecification {
    #[serde(rename = "testCases", default)]
    pub test_cases: Vec<TestCase>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestSpecification {
    pub fn new(test_cases: Vec<TestCase>) -> Self {
        Self {
            test_cases,
            extra: Map::new(),
        }
    }
}

/// Websocket event reporting the result of one test case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCaseUpdate {
    pub test: TestResult,
}

/// Result payload carried by [`TestCaseUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    pub id: String,
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl TestCaseUpdate {
    pub fn new(id: impl Into<String>, pass: bool) -> Self {
        Self {
            test: TestResult {
                id: id.into(),
                pass,
                name: None,
                endpoint: None,
            },
        }
    }
}
