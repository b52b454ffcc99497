//! Turning ABC text into the requested output format.

use anyhow::{Context, Result};
use tabconf::OutputFormat;
use whistle_abc::{notefile, parse_with, tab, transpose, whistle, TracingSink, WhistleKey};

use crate::Settings;

/// Render `abc` in the configured format. The result ends with a newline.
///
/// Tablature describes fingerings, so it is the same on every whistle; the
/// whistle only changes the sounding pitches in JSON and note-file output.
pub fn render(abc: &str, settings: &Settings) -> Result<String> {
    let mut sink = TracingSink;
    let mut result = parse_with(abc, &mut sink)?;

    if settings.fit {
        transpose::auto_transpose(&mut result.notes, &mut sink);
    }

    let rendered = match settings.format {
        OutputFormat::Tab => tab::render_with_line_breaks(&result.notes, abc, &mut sink),
        OutputFormat::Line => format!("{}\n", tab::render(&result.notes)),
        OutputFormat::Notes => {
            whistle::retune(&mut result.notes, WhistleKey::HighD, settings.whistle);
            format!("{}\n", notefile::to_note_file(&result.notes))
        }
        OutputFormat::Json => {
            whistle::retune(&mut result.notes, WhistleKey::HighD, settings.whistle);
            let json = serde_json::to_string_pretty(&result)
                .context("Failed to serialize parse result")?;
            format!("{}\n", json)
        }
    };

    Ok(rendered)
}
