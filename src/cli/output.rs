//! Output formatting utilities

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, interactive: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if interactive {
                OutputFormat::Table
            } else {
                OutputFormat::Tsv
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_follows_terminal() {
        assert_eq!(effective_format(OutputFormat::Auto, true), OutputFormat::Table);
        assert_eq!(effective_format(OutputFormat::Auto, false), OutputFormat::Tsv);
        assert_eq!(effective_format(OutputFormat::Json, true), OutputFormat::Json);
    }
}
