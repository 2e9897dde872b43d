#![forbid(unsafe_code)]

//! Shared models and logic for the conformance suite front end.

pub mod annotate;
pub mod locate;
pub mod model;
pub mod store;

pub use annotate::{annotations, annotations_with};
pub use locate::{JsonPathLocator, LocateError, PathLocator, PathPositions};
pub use model::*;
pub use store::{apply, duplicate_test_case_ids, Mutation, StoreState, WebSocketState};
