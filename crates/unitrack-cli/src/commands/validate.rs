//! The `unitrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(transcript_path: PathBuf) -> Result<()> {
    let transcript = unitrack_core::parser::parse_transcript(&transcript_path)?;

    let name = transcript
        .student
        .name
        .as_deref()
        .unwrap_or("unnamed student");
    println!("Transcript: {name} ({} courses)", transcript.courses.len());

    let warnings = unitrack_core::parser::validate_transcript(&transcript);
    for w in &warnings {
        let prefix = w
            .code
            .as_ref()
            .map(|code| format!("  [{code}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Transcript valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
