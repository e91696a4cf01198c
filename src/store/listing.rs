use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped when a file name becomes one path segment of a link.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn escape_html(s: &str) -> String {
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

/// Renders a minimal HTML page linking each name under `/files/`.
pub fn render_listing(names: &[String]) -> String {
    let mut html = String::from(
        "<html><head><title>Directory Listing</title></head><body><h1>Directory Listing</h1><ul>",
    );
    for name in names {
        let href = utf8_percent_encode(name, SEGMENT).to_string();
        html.push_str(&format!(
            "<li><a href=\"/files/{}\">{}</a></li>",
            escape_html(&href),
            escape_html(name)
        ));
    }
    html.push_str("</ul></body></html>");
    html
}
