//! Admin page assets: player-supplied text must never be parsed as HTML.

const APP_JS: &str = include_str!("../static/app.js");
const INDEX_HTML: &str = include_str!("../templates/index.html");

#[test]
fn app_js_never_writes_html_strings() {
    for sink in ["innerHTML", "outerHTML", "insertAdjacentHTML", "document.write"] {
        assert!(!APP_JS.contains(sink), "app.js uses {}", sink);
    }
}

#[test]
fn table_cells_are_filled_as_text() {
    assert!(APP_JS.contains("td.textContent"));
    assert!(APP_JS.contains("cell(r.candidate.name)"));
    assert!(APP_JS.contains("cell(t.name)"));
}

#[test]
fn index_loads_app_script() {
    assert!(INDEX_HTML.contains(r#"<script src="/static/app.js"></script>"#));
}
