//! The detect command: print the compression method of each input.

use super::io::{self, map_inputs, report_failures, write_output};
use crate::cli::DetectArgs;
use crate::engine::classify_method;
use anyhow::Result;
use std::path::Path;

pub fn run_detect(args: &DetectArgs, root: &Path) -> Result<()> {
    let inputs = io::inputs(&args.input, root);
    let results = map_inputs(&inputs, |text| Ok(classify_method(text)?.to_string()));

    let single = inputs.len() == 1;
    let printed: Vec<Result<()>> = inputs
        .iter()
        .zip(results)
        .map(|(input, result)| {
            let method = result?;
            if single {
                write_output(None, &method)
            } else {
                write_output(None, &format!("{}: {}", input.label(), method))
            }
        })
        .collect();

    report_failures(&inputs, &printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputOptions;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_detect_known_methods() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.glyph"), "函 f(){}").unwrap();
        fs::write(temp_dir.path().join("b.glyph"), "ཀ('fs',fs)༄").unwrap();
        fs::write(temp_dir.path().join("c.js"), "let x = 1;").unwrap();

        let args = DetectArgs {
            input: InputOptions {
                inputs: vec![
                    PathBuf::from("a.glyph"),
                    PathBuf::from("b.glyph"),
                    PathBuf::from("c.js"),
                ],
            },
        };
        assert!(run_detect(&args, temp_dir.path()).is_ok());
    }

    #[test]
    fn test_detect_ambiguous_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("x.glyph"), "const s = 'héllo';").unwrap();
        let args = DetectArgs {
            input: InputOptions {
                inputs: vec![PathBuf::from("x.glyph")],
            },
        };
        assert!(run_detect(&args, temp_dir.path()).is_err());
    }
}
