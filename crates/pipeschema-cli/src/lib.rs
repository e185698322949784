//! # pipeschema-cli: Pipeline Schema Command-Line Interface
//!
//! Prints the composed pipeline configuration schema as one compact,
//! newline-terminated JSON document on stdout. Diagnostics go to stderr
//! through `tracing`, so stdout can be redirected straight into a file.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the binary; this library only writes output.
//! - Composition is delegated to `pipeschema-schema`.

use std::io::Write;

use anyhow::Context;
use pipeschema_schema::pipeline_schema;

/// Compose the pipeline schema and write it to `out`.
///
/// Nothing is written unless composition and encoding both succeed.
pub fn write_schema(out: &mut impl Write) -> anyhow::Result<()> {
    let document = pipeline_schema().context("failed to compose pipeline schema")?;
    tracing::debug!(
        definitions = document.definitions.len(),
        "pipeline schema composed"
    );

    let json = document
        .to_json()
        .context("failed to encode pipeline schema")?;
    writeln!(out, "{json}").context("failed to write schema")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}
