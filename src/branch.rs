//! Preview branch naming.

use slug::slugify;

/// Branch a preview is published to: the slugged project name plus the
/// source ref, under the configured prefix. A detached HEAD contributes
/// no ref segment.
pub fn preview_branch(prefix: &str, project: &str, source_ref: &str) -> String {
    let project_slug = match slugify(project) {
        s if s.is_empty() => "app".to_string(),
        s => s,
    };

    let ref_slug = slugify(source_ref);
    let name = if ref_slug.is_empty() || ref_slug == "head" {
        project_slug
    } else {
        format!("{project_slug}-{ref_slug}")
    };

    if prefix.is_empty() {
        name
    } else if prefix.ends_with('/') || prefix.ends_with('-') {
        format!("{prefix}{name}")
    } else {
        format!("{prefix}/{name}")
    }
}
