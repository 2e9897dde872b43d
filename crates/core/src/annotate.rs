use crate::locate::{JsonPathLocator, LocateError, PathLocator};
use crate::model::{Annotation, AnnotationKind, DiscoveryProblem};

/// Converts discovery problems into editor annotations against the JSON `document`.
///
/// See [`annotations_with`].
pub fn annotations(
    problems: Option<&[DiscoveryProblem]>,
    document: &str,
) -> Result<Vec<Annotation>, LocateError> {
    annotations_with(&JsonPathLocator, problems, document)
}

/// Converts discovery problems into editor annotations using `locator`.
///
/// `None` yields no annotations and the document is not parsed. A problem is
/// placed at its `path` when the locator knows it, otherwise at its `parent`;
/// problems with an empty path or with neither path known are dropped.
/// Input order is preserved.
pub fn annotations_with<L: PathLocator + ?Sized>(
    locator: &L,
    problems: Option<&[DiscoveryProblem]>,
    document: &str,
) -> Result<Vec<Annotation>, LocateError> {
    let Some(problems) = problems else {
        return Ok(vec![]);
    };
    let paths = locator.locate(document)?;

    let out = problems
        .iter()
        .filter(|p| !p.path.is_empty())
        .filter_map(|p| {
            let at = paths
                .get(&p.path)
                .or_else(|| p.parent.as_ref().and_then(|parent| paths.get(parent)))?;
            Some(Annotation {
                row: at.line.saturating_sub(1),
                column: at.column,
                kind: AnnotationKind::Error,
                text: p.error.clone(),
            })
        })
        .collect();
    Ok(out)
}
