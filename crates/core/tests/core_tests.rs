//! Integration tests for the core crate.

use conformance_core::{
    annotations, annotations_with, duplicate_test_case_ids, Annotation, AnnotationKind,
    DiscoveryProblem, LocateError, Mutation, PathLocator, PathPositions, Position, StoreState,
    TestCase, TestCaseUpdate, TestSpecification, TestStatus,
};
use serde_json::json;

struct FixedLocator(PathPositions);

impl PathLocator for FixedLocator {
    fn locate(&self, _document: &str) -> Result<PathPositions, LocateError> {
        Ok(self.0.clone())
    }
}

fn problem(path: &str, parent: Option<&str>, error: &str) -> DiscoveryProblem {
    DiscoveryProblem {
        path: path.into(),
        parent: parent.map(String::from),
        error: error.into(),
    }
}

fn specs() -> Vec<TestSpecification> {
    serde_json::from_value(json!([
        {
            "apiSpecification": { "name": "Account and Transaction API" },
            "testCases": [
                { "@id": "#t1001", "name": "accounts", "meta": {} },
                { "@id": "#t1002", "name": "balances", "meta": { "tag": "x" } }
            ]
        },
        {
            "apiSpecification": { "name": "Payment Initiation API" },
            "testCases": [
                { "@id": "#t2001", "name": "payments", "meta": {} }
            ]
        }
    ]))
    .unwrap()
}

fn store() -> StoreState<String> {
    let mut state = StoreState::new();
    state.commit(Mutation::SetTestCases(specs()));
    state
}

fn status_of(state: &StoreState<String>, id: &str) -> Option<TestStatus> {
    state
        .test_cases
        .iter()
        .flat_map(|s| &s.test_cases)
        .find(|c| c.id == id)
        .and_then(TestCase::status)
}

#[test]
fn no_problems_means_no_annotations() {
    assert!(annotations(None, "not even json").unwrap().is_empty());
}

#[test]
fn annotation_row_is_zero_based() {
    let mut paths = PathPositions::new();
    paths.insert("a.b".into(), Position { line: 5, column: 2 });
    let problems = [problem("a.b", None, "E1")];

    let out = annotations_with(&FixedLocator(paths), Some(&problems[..]), "").unwrap();
    assert_eq!(
        out,
        vec![Annotation {
            row: 4,
            column: 2,
            kind: AnnotationKind::Error,
            text: "E1".into(),
        }]
    );
}

#[test]
fn unresolvable_problems_are_dropped_and_parent_is_fallback() {
    let doc = "{\n  \"discoveryModel\": {\n    \"name\": \"\"\n  }\n}";
    let problems = [
        problem("discoveryModel.missing", None, "gone"),
        problem("discoveryModel.name", None, "required"),
        problem("discoveryModel.version", Some("discoveryModel"), "unsupported"),
        problem("", Some("discoveryModel"), "no path"),
    ];

    let out = annotations(Some(&problems[..]), doc).unwrap();
    let texts: Vec<_> = out.iter().map(|a| (a.row, a.column, a.text.as_str())).collect();
    assert_eq!(texts, vec![(2, 4, "required"), (1, 2, "unsupported")]);
}

#[test]
fn escaped_non_bmp_key_is_annotated() {
    let doc = r#"{"\ud83d\ude00": 1}"#;
    let problems = [problem("\u{1F600}", None, "emoji")];
    let out = annotations(Some(&problems[..]), doc).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!((out[0].row, out[0].column), (0, 1));
}

#[test]
fn deeply_nested_document_is_an_error() {
    let doc = format!("{}{}", "[".repeat(20_000), "]".repeat(20_000));
    let problems = [problem("[0]", None, "x")];
    assert!(matches!(
        annotations(Some(&problems[..]), &doc),
        Err(LocateError::TooDeep { .. })
    ));
}

#[test]
fn annotation_serializes_with_type_field() {
    let a = Annotation {
        row: 0,
        column: 1,
        kind: AnnotationKind::Error,
        text: "bad".into(),
    };
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        json!({ "row": 0, "column": 1, "type": "error", "text": "bad" })
    );
}

#[test]
fn malformed_document_is_an_error() {
    let problems = [problem("a", None, "x")];
    assert!(annotations(Some(&problems[..]), "{\"a\": ").is_err());
}

#[test]
fn update_test_case_sets_status_of_matching_case_only() {
    let mut state = store();
    state.commit(Mutation::UpdateTestCase(TestCaseUpdate::new("#t1002", true)));
    assert_eq!(status_of(&state, "#t1002"), Some(TestStatus::Passed));
    assert_eq!(status_of(&state, "#t1001"), None);
    assert_eq!(status_of(&state, "#t2001"), None);

    state.commit(Mutation::UpdateTestCase(TestCaseUpdate::new("#t2001", false)));
    assert_eq!(status_of(&state, "#t2001"), Some(TestStatus::Failed));
}

#[test]
fn update_test_case_with_unknown_id_changes_nothing() {
    let mut state = store();
    let before = state.clone();
    state.commit(Mutation::UpdateTestCase(TestCaseUpdate::new("#nope", true)));
    assert_eq!(state, before);
}

#[test]
fn set_test_cases_status_preserves_other_fields() {
    let mut state = store();
    state.commit(Mutation::SetTestCasesStatus(TestStatus::Passed));

    let value = serde_json::to_value(&state.test_cases).unwrap();
    assert_eq!(
        value,
        json!([
            {
                "apiSpecification": { "name": "Account and Transaction API" },
                "testCases": [
                    { "@id": "#t1001", "name": "accounts", "meta": { "status": "PASSED" } },
                    { "@id": "#t1002", "name": "balances", "meta": { "status": "PASSED", "tag": "x" } }
                ]
            },
            {
                "apiSpecification": { "name": "Payment Initiation API" },
                "testCases": [
                    { "@id": "#t2001", "name": "payments", "meta": { "status": "PASSED" } }
                ]
            }
        ])
    );
}

#[test]
fn websocket_messages_accumulate_in_order() {
    let mut state = store();
    state.commit(Mutation::SetWebSocketMessage(json!({ "n": 1 })));
    state.commit(Mutation::SetWebSocketMessage(json!({ "n": 2 })));
    assert_eq!(state.ws.messages, vec![json!({ "n": 1 }), json!({ "n": 2 })]);
}

#[test]
fn replace_mutations() {
    let mut state = store();
    state.commit(Mutation::SetHasRunStarted(true));
    state.commit(Mutation::SetWebSocketConnection(Some("ws://localhost".into())));
    state.commit(Mutation::SetTestCases(vec![]));
    assert!(state.has_run_started);
    assert_eq!(state.ws.connection.as_deref(), Some("ws://localhost"));
    assert!(state.test_cases.is_empty());
}

#[test]
fn received_test_result_updates_status() {
    let mut state = store();
    state.receive_message(json!({
        "test": { "id": "#t1001", "name": "accounts", "endpoint": "GET /accounts", "pass": false }
    }));
    state.receive_message(json!({ "type": "ping" }));

    assert_eq!(status_of(&state, "#t1001"), Some(TestStatus::Failed));
    assert_eq!(state.ws.messages.len(), 2);
}

#[test]
fn duplicate_ids_are_reported() {
    let specs = vec![
        TestSpecification::new(vec![TestCase::new("a"), TestCase::new("b")]),
        TestSpecification::new(vec![TestCase::new("a")]),
    ];
    assert_eq!(duplicate_test_case_ids(&specs), vec!["a".to_string()]);
    assert!(duplicate_test_case_ids(&self::specs()).is_empty());
}

#[test]
fn test_status_serde() {
    assert_eq!(serde_json::to_string(&TestStatus::Passed).unwrap(), r#""PASSED""#);
    let failed: TestStatus = serde_json::from_str(r#""FAILED""#).unwrap();
    assert_eq!(failed, TestStatus::Failed);
}

#[test]
fn mutation_names() {
    let m: Mutation<()> = Mutation::SetTestCasesStatus(TestStatus::Failed);
    assert_eq!(m.name(), "SET_TEST_CASES_STATUS");
    let m: Mutation<()> = Mutation::UpdateTestCase(TestCaseUpdate::new("x", true));
    assert_eq!(m.name(), "UPDATE_TEST_CASE");
}
