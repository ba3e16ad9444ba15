//! Static asset constants.

/// Stylesheet for the web interface.
pub const CSS: &str = r#"
:root { --fg: #1f2328; --muted: #656d76; --accent: #0969da; --ok: #1a7f37; --warn: #9a6700; --err: #cf222e; --border: #d0d7de; }
* { box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; color: var(--fg); margin: 0; background: #f6f8fa; }
header { background: #24292f; padding: 0.75rem 1.5rem; }
header a { color: #fff; font-weight: 600; text-decoration: none; margin-right: 1.25rem; }
main { max-width: 60rem; margin: 1.5rem auto; padding: 0 1.5rem; }
section { background: #fff; border: 1px solid var(--border); border-radius: 6px; padding: 1rem 1.25rem; margin-bottom: 1.25rem; }
h1 { font-size: 1.5rem; }
h2 { font-size: 1.2rem; margin-top: 0; }
label { display: block; font-weight: 600; margin: 0.75rem 0 0.25rem; }
input[type=text], input[type=password], select, textarea { width: 100%; padding: 0.4rem; border: 1px solid var(--border); border-radius: 4px; font: inherit; }
button { margin-top: 1rem; padding: 0.45rem 1rem; background: var(--accent); color: #fff; border: 0; border-radius: 4px; font: inherit; cursor: pointer; }
.notice { padding: 0.5rem 0.75rem; border-radius: 4px; margin: 0.5rem 0; }
.success { background: #dafbe1; color: var(--ok); }
.warning { background: #fff8c5; color: var(--warn); }
.error { background: #ffebe9; color: var(--err); white-space: pre-line; }
.info { background: #ddf4ff; color: var(--accent); white-space: pre-line; }
.answer { border-left: 3px solid var(--accent); padding-left: 1rem; }
pre { white-space: pre-wrap; word-break: break-word; background: #f6f8fa; padding: 0.75rem; border-radius: 4px; }
ul.abbreviations { list-style: none; padding-left: 0; }
.muted { color: var(--muted); }
"#;
