use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub fixtures_dir: Option<PathBuf>,
    pub case_id: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("missing value for argument: {0}")]
    MissingValue(String),
    #[error("help requested")]
    HelpRequested,
}

impl CliOptions {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(CliError::HelpRequested),
                "--fixtures" => {
                    let value = iter.next().ok_or(CliError::MissingValue(arg.clone()))?;
                    options.fixtures_dir = Some(PathBuf::from(value));
                }
                "--case" => {
                    let value = iter.next().ok_or(CliError::MissingValue(arg.clone()))?;
                    options.case_id = Some(value.trim().to_string());
                }
                unknown => return Err(CliError::UnknownArgument(unknown.to_string())),
            }
        }

        Ok(options)
    }
}
