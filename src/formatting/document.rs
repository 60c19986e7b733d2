// src/formatting/document.rs
//! Standalone HTML documents.
//!
//! An assembled fragment is embedded unescaped into a page carrying the
//! stylesheet for every class the HTML renderer emits.

use crate::error::AppError;
use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde_json::json;

const DOCUMENT_TEMPLATE_NAME: &str = "html_document";

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}}</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
            line-height: 1.5;
            color: #37352f;
            margin: 0;
            padding: 20px;
        }

        .callout {
            padding: 16px;
            border-radius: 3px;
            display: flex;
            background-color: #f1f1f0;
            margin: 8px 0;
        }

        .callout-emoji {
            margin-right: 12px;
        }

        .column-list {
            display: flex;
            gap: 20px;
            margin: 8px 0;
        }

        .column {
            flex: 1;
        }

        pre {
            background-color: #f7f6f3;
            padding: 16px;
            border-radius: 3px;
            overflow-x: auto;
        }

        code {
            font-family: SFMono-Regular, Consolas, "Liberation Mono", Menlo, monospace;
        }

        .code-caption, .bookmark-caption {
            color: #787774;
            font-size: 0.9em;
        }

        figure {
            margin: 16px 0;
        }

        img {
            max-width: 100%;
            height: auto;
        }

        figcaption {
            color: #787774;
            font-size: 0.9em;
            text-align: center;
            margin-top: 8px;
        }

        .todo-item {
            display: flex;
            align-items: center;
            margin: 4px 0;
        }

        .bookmark {
            border: 1px solid #e3e2e0;
            border-radius: 3px;
            padding: 12px 16px;
            margin: 8px 0;
        }

        .embed-container iframe {
            width: 100%;
            min-height: 400px;
        }

        table {
            border-collapse: collapse;
            width: 100%;
            margin: 16px 0;
        }

        th, td {
            border: 1px solid #e3e2e0;
            padding: 8px 16px;
            text-align: left;
        }

        th {
            background-color: #f7f6f3;
        }

        .color-gray { color: #787774; }
        .color-brown { color: #9f6b53; }
        .color-orange { color: #d9730d; }
        .color-yellow { color: #cb912f; }
        .color-green { color: #448361; }
        .color-blue { color: #337ea9; }
        .color-purple { color: #9065b0; }
        .color-pink { color: #c14c8a; }
        .color-red { color: #d44c47; }

        .color-gray_background { background-color: #f1f1f0; }
        .color-brown_background { background-color: #f4eeee; }
        .color-orange_background { background-color: #fbecdd; }
        .color-yellow_background { background-color: #fbf3db; }
        .color-green_background { background-color: #edf3ec; }
        .color-blue_background { background-color: #e7f3f8; }
        .color-purple_background { background-color: #f4f0f7; }
        .color-pink_background { background-color: #f9ecf1; }
        .color-red_background { background-color: #fdebec; }
    </style>
</head>
<body>
{{{content}}}
</body>
</html>
"#;

static DOCUMENT_TEMPLATES: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string(DOCUMENT_TEMPLATE_NAME, DOCUMENT_TEMPLATE)
        .unwrap();
    handlebars
});

/// Wraps an HTML fragment into a complete HTML5 document titled `title`.
pub fn render_html_document(title: &str, fragment: &str) -> Result<String, AppError> {
    let data = json!({
        "title": title,
        "content": fragment,
    });

    DOCUMENT_TEMPLATES
        .render(DOCUMENT_TEMPLATE_NAME, &data)
        .map_err(|e| AppError::TemplateRenderError {
            name: DOCUMENT_TEMPLATE_NAME.to_string(),
            message: e.to_string(),
        })
}
