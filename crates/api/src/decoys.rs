//! Decoy route table and page rendering.
//!
//! Each decoy is a path mapped to a descriptor that only carries a display
//! title; every decoy answers with the same page shape.

use std::collections::BTreeMap;

/// Paths exposed when no decoy list is configured.
pub const DEFAULT_DECOY_PATHS: &[&str] = &[
    "/",
    "/admin",
    "/login",
    "/wp-login.php",
    "/phpmyadmin",
    "/administrator",
    "/console",
];

/// Descriptor for one decoy path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoyRoute {
    pub title: String,
}

impl DecoyRoute {
    /// Title shown for a path: the site root greets, everything else
    /// poses as an admin portal.
    pub fn for_path(path: &str) -> Self {
        let title = if path == "/" {
            "Welcome".to_string()
        } else {
            format!("Admin Portal ({})", path)
        };
        Self { title }
    }
}

/// Explicit mapping from request path to decoy descriptor.
#[derive(Debug, Clone, Default)]
pub struct DecoyTable {
    routes: BTreeMap<String, DecoyRoute>,
}

impl DecoyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a list of paths, titling each by [`DecoyRoute::for_path`].
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .fold(Self::new(), |table, path| {
                let path = path.as_ref();
                table.with_route(path, DecoyRoute::for_path(path))
            })
    }

    pub fn with_route(mut self, path: impl Into<String>, route: DecoyRoute) -> Self {
        self.routes.insert(path.into(), route);
        self
    }

    pub fn lookup(&self, path: &str) -> Option<&DecoyRoute> {
        self.routes.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn escape_html(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// Fixed login page for a decoy. Depends on the title only.
pub fn render_page(title: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!doctype html>
<html>
<head><title>{title}</title></head>
<body>
  <h2>{title}</h2>
  <form method="POST">
    <label>Username</label><br/>
    <input name="username" /><br/><br/>
    <label>Password</label><br/>
    <input name="password" type="password" /><br/><br/>
    <button type="submit">Sign in</button>
  </form>
</body>
</html>"#
    )
}
