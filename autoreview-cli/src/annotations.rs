//! GitHub Actions workflow commands

/// Report an error so it shows up on the workflow run
///
/// Outside of GitHub Actions this is a no-op; the failure has already been
/// logged through tracing.
pub fn error(message: &str) {
    if std::env::var("GITHUB_ACTIONS").as_deref() == Ok("true") {
        println!("::error::{}", escape(message));
    }
}

/// Escape a message for a workflow command line
fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
