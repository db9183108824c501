//! Input and output plumbing shared by the commands.
//!
//! Inputs are files relative to the project root or `-` for stdin. Several inputs are
//! transformed in parallel; results come back in input order so stdout stays readable.

use crate::cli::InputOptions;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Suffix of compressed files written with --write
pub const GLYPH_EXTENSION: &str = "glyph";

/// One resolved input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn label(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Input::Stdin => None,
            Input::File(path) => Some(path),
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read from stdin")?;
                Ok(buffer)
            }
            Input::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

/// Resolve a path against the project root
pub fn resolve(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Resolved inputs; no inputs at all means stdin
pub fn inputs(options: &InputOptions, root: &Path) -> Vec<Input> {
    if options.inputs.is_empty() {
        return vec![Input::Stdin];
    }
    options
        .inputs
        .iter()
        .map(|path| {
            if path.as_os_str() == "-" {
                Input::Stdin
            } else {
                Input::File(resolve(path, root))
            }
        })
        .collect()
}

/// Read and transform every input, in parallel, keeping input order
pub fn map_inputs<T, F>(inputs: &[Input], f: F) -> Vec<Result<T>>
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    inputs
        .par_iter()
        .map(|input| {
            let text = input.read()?;
            f(&text).with_context(|| input.label())
        })
        .collect()
}

/// Write to a file, or stdout when no path is given
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n").context("Failed to write to stdout")?;
            }
            Ok(())
        }
    }
}

/// `app.js` -> `app.js.glyph`
pub fn glyph_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(GLYPH_EXTENSION);
    PathBuf::from(name)
}

/// `app.js.glyph` -> `app.js`
pub fn unglyph_path(path: &Path) -> Result<PathBuf> {
    if path.extension().and_then(|e| e.to_str()) == Some(GLYPH_EXTENSION) {
        Ok(path.with_extension(""))
    } else {
        anyhow::bail!(
            "{} has no .{} suffix; use --output instead",
            path.display(),
            GLYPH_EXTENSION
        )
    }
}

/// Print per-input failures and turn them into one error
pub fn report_failures(inputs: &[Input], results: &[Result<()>]) -> Result<()> {
    let mut errors = 0;
    for (input, result) in inputs.iter().zip(results) {
        if let Err(e) = result {
            eprintln!("Error processing {}: {:#}", input.label(), e);
            errors += 1;
        }
    }
    if errors > 0 {
        if inputs.len() == 1 {
            anyhow::bail!("{} failed", inputs[0].label());
        }
        anyhow::bail!("{} of {} inputs failed", errors, inputs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_inputs_default_to_stdin() {
        let inputs = inputs(&InputOptions::default(), Path::new("/project"));
        assert_eq!(inputs, vec![Input::Stdin]);
    }

    #[test]
    fn test_inputs_resolve_against_root() {
        let options = InputOptions {
            inputs: vec![PathBuf::from("src/a.js"), PathBuf::from("-"), PathBuf::from("/abs/b.js")],
        };
        let inputs = inputs(&options, Path::new("/project"));
        assert_eq!(
            inputs,
            vec![
                Input::File(PathBuf::from("/project/src/a.js")),
                Input::Stdin,
                Input::File(PathBuf::from("/abs/b.js")),
            ]
        );
    }

    #[test]
    fn test_glyph_paths() {
        assert_eq!(glyph_path(Path::new("src/app.js")), PathBuf::from("src/app.js.glyph"));
        assert_eq!(
            unglyph_path(Path::new("src/app.js.glyph")).unwrap(),
            PathBuf::from("src/app.js")
        );
        assert!(unglyph_path(Path::new("src/app.js")).is_err());
    }

    #[test]
    fn test_map_inputs_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut inputs = Vec::new();
        for i in 0..8 {
            let path = temp_dir.path().join(format!("{}.js", i));
            fs::write(&path, i.to_string()).unwrap();
            inputs.push(Input::File(path));
        }
        let results = map_inputs(&inputs, |text| Ok(format!("<{}>", text)));
        let outputs: Vec<String> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(outputs[0], "<0>");
        assert_eq!(outputs[7], "<7>");
    }

    #[test]
    fn test_map_inputs_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = vec![Input::File(temp_dir.path().join("missing.js"))];
        let results = map_inputs(&inputs, |text| Ok(text.len()));
        assert!(results[0].is_err());
    }

    #[test]
    fn test_report_failures() {
        let inputs = vec![Input::File(PathBuf::from("a.js")), Input::File(PathBuf::from("b.js"))];
        assert!(report_failures(&inputs, &[Ok(()), Ok(())]).is_ok());
        let err = report_failures(&inputs, &[Ok(()), Err(anyhow::anyhow!("boom"))]).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
    }
}
