use axum::response::Html;
use std::path::PathBuf;

/// Entry page of a dashboard module.
///
/// The frontend bundle (trunk `dist/`) is a single-page app that routes on
/// the URL path, so every module serves the same `index.html`. When the
/// bundle has not been built a small placeholder is returned instead.
#[derive(Debug, Clone)]
pub struct ModulePage {
    index_file: PathBuf,
    title: &'static str,
}

impl ModulePage {
    pub fn new(static_dir: impl Into<PathBuf>, title: &'static str) -> Self {
        Self {
            index_file: static_dir.into().join("index.html"),
            title,
        }
    }

    pub async fn render(&self) -> Html<String> {
        match tokio::fs::read_to_string(&self.index_file).await {
            Ok(html) => Html(html),
            Err(e) => {
                tracing::warn!(
                    "Frontend bundle not found at {}: {}",
                    self.index_file.display(),
                    e
                );
                Html(self.placeholder())
            }
        }
    }

    fn placeholder(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<h1>{title}</h1>
<p>El frontend no está compilado. Ejecute <code>trunk build --release</code> en <code>crates/frontend</code>.</p>
</body>
</html>"#,
            title = self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_bundle_renders_placeholder() {
        let page = ModulePage::new("/nonexistent/dist", "Matriz de Posicionamiento");
        let Html(body) = page.render().await;
        assert!(body.contains("<title>Matriz de Posicionamiento</title>"));
    }
}
