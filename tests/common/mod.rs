#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

/// Renders an export-style sheet: the header, five preamble rows, then data.
pub fn sheet_html(header: &[&str], data: &[&[&str]]) -> String {
    let mut html = String::from("<html><body><table border=\"1\">\n");
    push_row(&mut html, "th", header);
    for index in 0..5 {
        let filler = format!("Preamble line {index}");
        push_row(&mut html, "td", &[filler.as_str()]);
    }
    for row in data {
        push_row(&mut html, "td", row);
    }
    html.push_str("</table></body></html>\n");
    html
}

fn push_row(html: &mut String, tag: &str, cells: &[&str]) {
    html.push_str("<tr>");
    for cell in cells {
        html.push_str(&format!("<{tag}>{cell}</{tag}>"));
    }
    html.push_str("</tr>\n");
}

/// Writes `html` encoded as windows-1252, the way the exports are saved.
pub fn write_sheet(dir: &Path, name: &str, html: &str) -> PathBuf {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(html);
    assert!(!unmappable, "fixture must be representable in windows-1252");
    let path = dir.join(name);
    fs::write(&path, bytes).expect("sheet written");
    path
}
