//! HTML page rendering.
//!
//! One function per page, building escaped HTML strings. The pages are
//! deliberately plain: a shared layout, no client-side code beyond forms.

use crate::store::{BoxSummary, SearchHit};

/// Escape text for safe interpolation into HTML.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page skeleton.
fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
nav {{ margin-bottom: 1.5rem; }}
nav a {{ margin-right: 1rem; }}
pre {{ background: #f4f4f4; padding: 1rem; overflow-x: auto; white-space: pre-wrap; }}
textarea {{ width: 100%; font-family: monospace; }}
.photos img {{ max-width: 12rem; max-height: 12rem; margin: 0.25rem; }}
.muted {{ color: #666; font-size: 0.9em; }}
form.inline {{ display: inline; }}
</style>
</head>
<body>
<nav><a href="/">Boxes</a><a href="/new">New box</a>
<form class="inline" action="/search" method="get">
<input type="search" name="q" placeholder="Search boxes">
<button type="submit">Search</button>
</form></nav>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Home page: all boxes, most recently modified first.
#[must_use]
pub fn index(boxes: &[BoxSummary]) -> String {
    let mut body = String::from("<h1>Boxes</h1>\n");
    if boxes.is_empty() {
        body.push_str("<p>No boxes yet. <a href=\"/new\">Create one</a>.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for b in boxes {
            body.push_str(&format!(
                "<li><a href=\"/box/{id}\">{title}</a> \
                 <span class=\"muted\">{id}, modified {modified}</span></li>\n",
                id = escape(&b.id),
                title = escape(&b.title),
                modified = b.modified.format("%Y-%m-%d %H:%M"),
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Boxes", &body)
}

/// Box detail page: content, QR code, photos, and per-box actions.
#[must_use]
pub fn view_box(
    box_id: &str,
    content: &str,
    qr_base64: &str,
    qr_url: &str,
    photos: &[String],
) -> String {
    let id = escape(box_id);
    let mut body = format!(
        r#"<h1>{id}</h1>
<p><a href="/box/{id}/edit">Edit</a></p>
<pre>{content}</pre>
<h2>QR code</h2>
<p><img src="data:image/png;base64,{qr_base64}" alt="QR code for {id}" width="150"></p>
<p class="muted">{qr_url} &middot; <a href="/box/{id}/qr">Download PNG</a></p>
<h2>Photos</h2>
"#,
        content = escape(content),
        qr_url = escape(qr_url),
    );

    if photos.is_empty() {
        body.push_str("<p class=\"muted\">No photos yet.</p>\n");
    } else {
        body.push_str("<div class=\"photos\">\n");
        for name in photos {
            let name = escape(name);
            body.push_str(&format!(
                r#"<figure class="inline">
<a href="/box/{id}/photos/{name}"><img src="/box/{id}/photos/{name}" alt="{name}"></a>
<form class="inline" action="/box/{id}/photos/{name}/delete" method="post">
<button type="submit">Delete</button>
</form>
</figure>
"#,
            ));
        }
        body.push_str("</div>\n");
    }

    body.push_str(&format!(
        r#"<form action="/box/{id}/photos" method="post" enctype="multipart/form-data">
<input type="file" name="photo" accept="image/*">
<button type="submit">Upload photo</button>
</form>
<hr>
<form action="/box/{id}/delete" method="post"
 onsubmit="return confirm('Delete this box and all its photos?')">
<button type="submit">Delete box</button>
</form>
"#,
    ));

    layout(box_id, &body)
}

/// Edit form for a box's markdown content.
#[must_use]
pub fn edit_box(box_id: &str, content: &str) -> String {
    let id = escape(box_id);
    let body = format!(
        r#"<h1>Edit {id}</h1>
<form action="/box/{id}/edit" method="post">
<textarea name="content" rows="20">{content}</textarea>
<p><button type="submit">Save</button> <a href="/box/{id}">Cancel</a></p>
</form>
"#,
        content = escape(content),
    );
    layout(&format!("Edit {box_id}"), &body)
}

/// Search results page.
#[must_use]
pub fn search(query: &str, hits: &[SearchHit]) -> String {
    let mut body = format!("<h1>Search: {}</h1>\n", escape(query));

    if hits.is_empty() {
        body.push_str("<p class=\"muted\">No matches.</p>\n");
    } else {
        for hit in hits {
            body.push_str(&format!(
                "<h2><a href=\"/box/{id}\">{title}</a> <span class=\"muted\">{id}</span></h2>\n",
                id = escape(&hit.id),
                title = escape(&hit.title),
            ));
            body.push_str("<ul>\n");
            for line in &hit.preview {
                body.push_str(&format!("<li>{}</li>\n", escape(line)));
            }
            body.push_str("</ul>\n");
        }
    }

    layout(&format!("Search: {query}"), &body)
}
