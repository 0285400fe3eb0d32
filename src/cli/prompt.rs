//! Register name conflict handling for the command line
//!
//! `--overwrite` and `--rename` answer up front; otherwise the user is
//! asked on stdin.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::CheckbookPaths;
use crate::error::{CheckbookError, CheckbookResult};
use crate::services::{validate_account_name, ConflictResolution, ConflictResolver};

/// Resolves conflicts from command-line flags alone
///
/// Without a flag the answer is `Abort`, so nothing is ever overwritten
/// silently.
#[derive(Debug)]
pub struct FlagResolver<'a> {
    paths: &'a CheckbookPaths,
    overwrite: bool,
    rename: Option<String>,
}

impl<'a> FlagResolver<'a> {
    pub fn new(paths: &'a CheckbookPaths, overwrite: bool, rename: Option<String>) -> Self {
        Self {
            paths,
            overwrite,
            rename,
        }
    }

    /// The answer implied by the flags, if they give one
    fn answer(&mut self) -> CheckbookResult<Option<ConflictResolution>> {
        if self.overwrite {
            return Ok(Some(ConflictResolution::Overwrite));
        }
        match self.rename.take() {
            Some(name) => rename_to(self.paths, &name).map(Some),
            None => Ok(None),
        }
    }
}

impl ConflictResolver for FlagResolver<'_> {
    fn resolve(&mut self, _existing: &Path) -> CheckbookResult<ConflictResolution> {
        Ok(self.answer()?.unwrap_or(ConflictResolution::Abort))
    }
}

/// Resolves conflicts from flags, then by asking on stdin
#[derive(Debug)]
pub struct PromptResolver<'a> {
    flags: FlagResolver<'a>,
}

impl<'a> PromptResolver<'a> {
    pub fn new(flags: FlagResolver<'a>) -> Self {
        Self { flags }
    }
}

impl ConflictResolver for PromptResolver<'_> {
    fn resolve(&mut self, existing: &Path) -> CheckbookResult<ConflictResolution> {
        if let Some(answer) = self.flags.answer()? {
            return Ok(answer);
        }

        let stdin = io::stdin();
        ask(existing, self.flags.paths, &mut stdin.lock())
    }
}

fn rename_to(paths: &CheckbookPaths, name: &str) -> CheckbookResult<ConflictResolution> {
    validate_account_name(name)?;
    Ok(ConflictResolution::Rename(paths.register_file(name)))
}

/// Ask what to do about `existing`, reading answers from `input`
///
/// End of input counts as abort.
fn ask<R: BufRead>(
    existing: &Path,
    paths: &CheckbookPaths,
    input: &mut R,
) -> CheckbookResult<ConflictResolution> {
    loop {
        let answer = prompt_string(
            &format!(
                "Register {} already exists. [o]verwrite, [r]ename or [a]bort? [a]: ",
                existing.display()
            ),
            input,
        )?;

        match answer.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("") | Some("a") | Some("abort") => return Ok(ConflictResolution::Abort),
            Some("o") | Some("overwrite") => return Ok(ConflictResolution::Overwrite),
            Some("r") | Some("rename") => {
                let name = prompt_string("New account name: ", input)?.unwrap_or_default();
                match rename_to(paths, &name) {
                    Ok(resolution) => return Ok(resolution),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Some(other) => eprintln!("Unrecognised answer '{}'", other),
        }
    }
}

/// Print `prompt` and read one trimmed line; `None` at end of input
fn prompt_string<R: BufRead>(prompt: &str, input: &mut R) -> CheckbookResult<Option<String>> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| CheckbookError::Io(e.to_string()))?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| CheckbookError::Io(e.to_string()))?;

    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}
