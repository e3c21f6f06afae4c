//! HTML served by the router.

use crate::models::NoteBody;

/// The single-page UI served at `GET /`.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Renders the detail view of one note.
///
/// Title and content are embedded as-is. Content goes inside a `<pre>`
/// block so line breaks survive.
pub fn render_note_page(note: &NoteBody) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
  <pre>{content}</pre>
</body>
</html>
"#,
        title = note.title,
        content = note.content
    )
}
