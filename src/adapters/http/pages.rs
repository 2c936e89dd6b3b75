//! Placeholder page handlers.
//!
//! The chat UI is not built yet; these render the minimal pages the router
//! serves in the meantime. Login and signup forms come with the auth UI
//! work.

use axum::extract::Path;
use axum::response::Html;

use super::gate::CurrentUser;

fn render_page(heading: &str, note: Option<&str>) -> Html<String> {
    let note = note
        .map(|text| format!("<p>{text}</p>"))
        .unwrap_or_default();

    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>RyokuChat</title></head>\n<body><main><h1>{heading}</h1>{note}</main></body>\n</html>\n"
    ))
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `GET /` - home page for signed-in users.
pub async fn home_page(CurrentUser(user): CurrentUser) -> Html<String> {
    let note = format!(
        "Signed in as {}",
        escape_html(user.display_name_or_email())
    );
    render_page("RyokuChat", Some(&note))
}

/// `GET /login`
pub async fn login_page() -> Html<String> {
    render_page("Login", None)
}

/// `GET /signup`
pub async fn signup_page() -> Html<String> {
    render_page("Sign Up", None)
}

/// `GET /channels/:channel_id` - placeholder until the chat UI lands.
pub async fn channel_page(
    CurrentUser(_user): CurrentUser,
    Path(channel_id): Path<String>,
) -> Html<String> {
    render_page(&format!("Channel {}", escape_html(&channel_id)), None)
}
