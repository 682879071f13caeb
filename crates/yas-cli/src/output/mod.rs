use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};

/// Human-readable rendering of a command response.
pub trait TextView {
    fn to_text(&self) -> String;
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + TextView>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(value.to_text()),
    }
}

/// Print a response in the requested format.
///
/// Text output is skipped in quiet mode; empty text prints nothing.
pub fn output<T: Serialize + TextView>(value: &T, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.quiet && flags.format == OutputFormat::Text {
        return Ok(());
    }
    let rendered = render(value, flags.format)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
        count: u32,
    }

    impl TextView for Sample {
        fn to_text(&self) -> String {
            format!("{} x{}", self.name, self.count)
        }
    }

    #[test]
    fn renders_text_and_json() {
        let sample = Sample {
            name: "users",
            count: 2,
        };
        assert_eq!(
            render(&sample, OutputFormat::Text).expect("text renders"),
            "users x2"
        );
        assert_eq!(
            render(&sample, OutputFormat::Json).expect("json renders"),
            "{\n  \"name\": \"users\",\n  \"count\": 2\n}"
        );
    }
}
