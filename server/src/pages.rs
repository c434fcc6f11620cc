//! Server-rendered pages. HTML is built with format! over escaped values;
//! no template engine, the renderer is just a function of its data context.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    /// Error indicator set by the form registration redirects.
    pub error: Option<String>,
}

/// GET /: post listing with a registration form for anonymous visitors.
pub async fn index_page(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>, ApiError> {
    let db = state.db.clone();
    let posts = tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|e| ApiError::Internal(format!("DB lock: {e}")))?;
        Ok::<_, ApiError>(db::posts::list(&conn)?)
    })
    .await??;

    let error_banner = params
        .error
        .map(|e| format!(r#"<p class="error">{}</p>"#, html_escape(&e)))
        .unwrap_or_default();

    let identity = match &user {
        Some(u) => format!("<p>Signed in as <strong>{}</strong></p>", html_escape(&u.username)),
        None => r#"<form method="post" action="/register">
            <input name="username" placeholder="username">
            <input name="password" type="password" placeholder="password">
            <button type="submit">Register</button>
        </form>"#
            .to_string(),
    };

    let post_items: String = posts
        .iter()
        .map(|p| {
            format!(
                r#"<article>
    <h2>{title}</h2>
    <p>{content}</p>
    <footer>by {author} at {created}</footer>
</article>"#,
                title = html_escape(&p.title),
                content = html_escape(&p.content),
                author = html_escape(&p.author),
                created = html_escape(&p.created_at),
            )
        })
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>parlor</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 640px; margin: 2rem auto; color: #222; }}
        article {{ border-bottom: 1px solid #ddd; padding: 1rem 0; }}
        footer {{ color: #888; font-size: 0.85rem; }}
        .error {{ color: #b00020; }}
        nav a {{ margin-right: 1rem; }}
    </style>
</head>
<body>
    <nav><a href="/">Home</a><a href="/chat">Chat</a></nav>
    <h1>parlor</h1>
    {error}
    {identity}
    {posts}
</body>
</html>"#,
        error = error_banner,
        identity = identity,
        posts = post_items,
    );

    Ok(Html(html))
}

/// GET /chat: chat page with a minimal WebSocket client.
pub async fn chat_page(user: Option<AuthUser>) -> Html<String> {
    let greeting = match &user {
        Some(u) => format!("Chatting as <strong>{}</strong>", html_escape(&u.username)),
        None => "Chatting anonymously".to_string(),
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>parlor chat</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 640px; margin: 2rem auto; color: #222; }}
        #log {{ border: 1px solid #ddd; height: 320px; overflow-y: auto; padding: 0.5rem; white-space: pre-wrap; }}
        #entry {{ width: 100%; box-sizing: border-box; margin-top: 0.5rem; }}
    </style>
</head>
<body>
    <nav><a href="/">Home</a></nav>
    <h1>parlor chat</h1>
    <p>{greeting}</p>
    <div id="log"></div>
    <input id="entry" placeholder="Say something and press Enter" autofocus>
    <script>
        const log = document.getElementById("log");
        const entry = document.getElementById("entry");
        const proto = location.protocol === "https:" ? "wss:" : "ws:";
        const ws = new WebSocket(proto + "//" + location.host + "/ws");
        ws.onmessage = (ev) => {{
            log.textContent += ev.data + "\n";
            log.scrollTop = log.scrollHeight;
        }};
        entry.addEventListener("keydown", (ev) => {{
            if (ev.key === "Enter" && entry.value.trim() !== "") {{
                ws.send(entry.value);
                entry.value = "";
            }}
        }});
    </script>
</body>
</html>"#,
        greeting = greeting,
    );

    Html(html)
}
