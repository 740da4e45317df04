//! Renders the bootstrap `<script>` tag injected into the dev server HTML.

use crate::contracts::RuntimeBootstrapPayload;

/// A module script that imports the runtime entry and boots it with the
/// action manifest. Construction is owned by the composition root, so the
/// call is unconditional; there is no "already booted" marker to check.
pub fn render_bootstrap_tag(payload: &RuntimeBootstrapPayload, bootstrap_module: &str) -> String {
    let manifest = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    let module = serde_json::to_string(bootstrap_module).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "<script type=\"module\">\nimport {{ bootstrapEditorRuntime }} from {};\nbootstrapEditorRuntime({});\n</script>",
        escape_inline_script(&module),
        escape_inline_script(&manifest),
    )
}

/// Keeps inline JSON from terminating the surrounding script tag early.
fn escape_inline_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
