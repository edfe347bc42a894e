// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-page HTML report of demo sections.

use std::fmt::Write as _;

#[derive(Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) svg: String,
    /// Extra lines shown under the chart (legend data, tooltips).
    pub(crate) notes: Vec<String>,
}

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(title));
    out.push_str(
        "<style>body{font-family:sans-serif;margin:24px;color:#222}\
         section{margin-bottom:32px}svg{border:1px solid #eee}\
         pre{background:#f6f6f6;padding:8px;font-size:12px}</style>\n",
    );
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(title));
    for section in sections {
        out.push_str("<section>\n");
        let _ = writeln!(out, "<h2>{}</h2>", escape_html(section.title));
        let _ = writeln!(out, "<p>{}</p>", escape_html(section.description));
        out.push_str(&section.svg);
        if !section.notes.is_empty() {
            out.push_str("<pre>");
            for note in &section.notes {
                out.push_str(&escape_html(note));
                out.push('\n');
            }
            out.push_str("</pre>\n");
        }
        out.push_str("</section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
