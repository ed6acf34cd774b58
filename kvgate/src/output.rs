//! Rendering results for the calling pipeline.

use kvgate_types::SecretResult;

const DELIMITER: &str = "KVGATE_EOF";

/// Render results as an env file: one `NAME=value` line per result, in order.
///
/// Values containing a newline use the heredoc form
///
/// ```text
/// NAME<<KVGATE_EOF
/// line one
/// line two
/// KVGATE_EOF
/// ```
///
/// with the delimiter lengthened until it does not occur in the value.
pub fn render_env_file(results: &[SecretResult]) -> String {
    let mut out = String::new();
    for result in results {
        let name = &result.request.env_var_name;
        let value = result.value.expose();
        if value.contains('\n') || value.contains('\r') {
            let mut delimiter = DELIMITER.to_owned();
            while value.contains(&delimiter) {
                delimiter.push('_');
            }
            out.push_str(&format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"));
        } else {
            out.push_str(&format!("{name}={value}\n"));
        }
    }
    out
}
