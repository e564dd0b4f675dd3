//! Page rendering for Corkboard.
//!
//! Handlers hand this service plain values (field schemas, submitted
//! values, validation errors, comment sets, notices) and get back a
//! complete HTML document. All user-supplied content is escaped here.

use chrono::{DateTime, Utc};

use crate::db::CommentWithAuthor;
use crate::models::{FieldErrors, FieldSpec, FormValues, InputKind};

/// One row of a record list view.
#[derive(Debug, Clone)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub author_name: Option<String>,
    pub modify_date: DateTime<Utc>,
}

/// Builds the HTML pages the board serves.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Renderer
    }

    // ========================================================================
    // Record pages
    // ========================================================================

    /// New/edit form for a record kind.
    #[allow(clippy::too_many_arguments)]
    pub fn record_form(
        &self,
        heading: &str,
        action: &str,
        schema: &[FieldSpec],
        values: &FormValues,
        errors: &FieldErrors,
        user: Option<&str>,
        notice: Option<&str>,
    ) -> String {
        let mut rows = String::new();
        for field in schema {
            let value = values.get(field.name).map(String::as_str).unwrap_or("");
            let error = errors
                .get(field.name)
                .map(|e| format!(r#" <span class="error">{}</span>"#, escape(e)))
                .unwrap_or_default();
            let input = match field.input {
                InputKind::Text => format!(
                    r#"<input type="text" name="{}" value="{}">"#,
                    field.name,
                    escape(value)
                ),
                InputKind::Number => format!(
                    r#"<input type="number" name="{}" value="{}">"#,
                    field.name,
                    escape(value)
                ),
                InputKind::Date => format!(
                    r#"<input type="date" name="{}" value="{}">"#,
                    field.name,
                    escape(value)
                ),
                InputKind::Checkbox => {
                    let checked = if value.is_empty() { "" } else { " checked" };
                    format!(r#"<input type="checkbox" name="{}"{}>"#, field.name, checked)
                }
            };
            rows.push_str(&format!(
                "<p><label>{}</label> {}{}</p>\n",
                escape(field.label),
                input,
                error
            ));
        }

        let body = format!(
            "<h1>{}</h1>\n<form method=\"post\" action=\"{}\">\n{}<p><button type=\"submit\">Save</button></p>\n</form>",
            escape(heading),
            action,
            rows
        );
        self.page(heading, user, notice, &body)
    }

    /// Detail page for one record, with its comments.
    #[allow(clippy::too_many_arguments)]
    pub fn record_detail(
        &self,
        label: &str,
        kind: &str,
        id: &str,
        title: &str,
        fields: &[(&'static str, String)],
        author_name: &str,
        modify_date: DateTime<Utc>,
        comments: &[CommentWithAuthor],
        user: Option<&str>,
        notice: Option<&str>,
    ) -> String {
        let mut body = format!("<h1>{}</h1>\n<dl>\n", escape(title));
        for (field_label, value) in fields {
            body.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                escape(field_label),
                escape(value)
            ));
        }
        body.push_str("</dl>\n");
        body.push_str(&format!(
            "<p>Posted by {} · last modified {}</p>\n",
            escape(author_name),
            modify_date.format("%Y-%m-%d %H:%M")
        ));
        body.push_str(&format!(
            r#"<p><a href="/{kind}/edit/{id}">Edit</a> | <a href="/{kind}/delete/{id}">Delete</a> | <a href="/{kind}/list">Back to list</a></p>"#,
        ));

        body.push_str("\n<h2>Comments</h2>\n");
        if comments.is_empty() {
            body.push_str("<p>No comments yet.</p>\n");
        } else {
            body.push_str("<ul>\n");
            for comment in comments {
                body.push_str(&format!(
                    "<li>{} — {} ({})</li>\n",
                    escape(&comment.content),
                    escape(comment.author_name.as_deref().unwrap_or("unknown")),
                    comment.create_date.format("%Y-%m-%d %H:%M")
                ));
            }
            body.push_str("</ul>\n");
        }

        self.page(&format!("{} {}", label, title), user, notice, &body)
    }

    /// List page for a record kind.
    pub fn record_list(
        &self,
        heading: &str,
        kind: &str,
        label: &str,
        rows: &[ListRow],
        user: Option<&str>,
        notice: Option<&str>,
    ) -> String {
        let mut body = format!(
            "<h1>{}</h1>\n<p><a href=\"/{}/new\">New {}</a></p>\n",
            escape(heading),
            kind,
            escape(label)
        );

        if rows.is_empty() {
            body.push_str(&format!("<p>No {} listed yet.</p>\n", escape(label)));
        } else {
            body.push_str("<table>\n<tr><th>Name</th><th>Posted by</th><th>Last modified</th></tr>\n");
            for row in rows {
                body.push_str(&format!(
                    r#"<tr><td><a href="/{}/{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                    kind,
                    row.id,
                    escape(&row.title),
                    escape(row.author_name.as_deref().unwrap_or("unknown")),
                    row.modify_date.format("%Y-%m-%d %H:%M")
                ));
                body.push('\n');
            }
            body.push_str("</table>\n");
        }

        self.page(heading, user, notice, &body)
    }

    // ========================================================================
    // Auth and landing pages
    // ========================================================================

    pub fn index(&self, user: Option<&str>, notice: Option<&str>) -> String {
        let body = "<h1>Corkboard</h1>\n\
             <p>The neighbourhood board for local businesses and dogs.</p>\n\
             <ul>\n\
             <li><a href=\"/business/list\">Browse businesses</a></li>\n\
             <li><a href=\"/business/favorites\">Favorite businesses</a></li>\n\
             <li><a href=\"/dog/list\">Browse dogs</a></li>\n\
             </ul>";
        self.page("Home", user, notice, body)
    }

    pub fn login(&self, values: &FormValues, error: Option<&str>, notice: Option<&str>) -> String {
        let email = values.get("email").map(String::as_str).unwrap_or("");
        let error_html = error
            .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
            .unwrap_or_default();
        let body = format!(
            "<h1>Log in</h1>\n{error_html}\
             <form method=\"post\" action=\"/login\">\n\
             <p><label>Email</label> <input type=\"email\" name=\"email\" value=\"{}\"></p>\n\
             <p><label>Password</label> <input type=\"password\" name=\"password\"></p>\n\
             <p><button type=\"submit\">Log in</button></p>\n\
             </form>\n\
             <p>No account? <a href=\"/register\">Register</a></p>",
            escape(email)
        );
        self.page("Log in", None, notice, &body)
    }

    pub fn register(&self, values: &FormValues, error: Option<&str>) -> String {
        let email = values.get("email").map(String::as_str).unwrap_or("");
        let display_name = values.get("display_name").map(String::as_str).unwrap_or("");
        let error_html = error
            .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
            .unwrap_or_default();
        let body = format!(
            "<h1>Register</h1>\n{error_html}\
             <form method=\"post\" action=\"/register\">\n\
             <p><label>Email</label> <input type=\"email\" name=\"email\" value=\"{}\"></p>\n\
             <p><label>Display name</label> <input type=\"text\" name=\"display_name\" value=\"{}\"></p>\n\
             <p><label>Password</label> <input type=\"password\" name=\"password\"></p>\n\
             <p><button type=\"submit\">Register</button></p>\n\
             </form>\n\
             <p>Already registered? <a href=\"/login\">Log in</a></p>",
            escape(email),
            escape(display_name)
        );
        self.page("Register", None, None, &body)
    }

    // ========================================================================
    // Page chrome
    // ========================================================================

    fn page(&self, title: &str, user: Option<&str>, notice: Option<&str>, body: &str) -> String {
        let nav = match user {
            Some(name) => format!(
                r#"<nav><a href="/">Corkboard</a> | <a href="/business/list">Businesses</a> | <a href="/dog/list">Dogs</a> | {} | <a href="/logout">Log out</a></nav>"#,
                escape(name)
            ),
            None => {
                r#"<nav><a href="/">Corkboard</a> | <a href="/login">Log in</a> | <a href="/register">Register</a></nav>"#
                    .to_string()
            }
        };
        let notice_html = notice
            .map(|n| format!(r#"<p class="notice">{}</p>"#, escape(n)))
            .unwrap_or_default();

        format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{} · Corkboard</title></head>\n<body>\n{}\n{}{}\n</body>\n</html>",
            escape(title),
            nav,
            notice_html,
            body
        )
    }
}

/// Escape text for interpolation into HTML content or attributes.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
