//! Command-line configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::parser::ParserOptions;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown flag {0:?}")]
    UnknownFlag(String),
    #[error("flag {0:?} needs a value")]
    MissingValue(String),
    #[error("invalid value {value:?} for {flag:?}")]
    InvalidValue { flag: String, value: String },
    #[error("more than one source file given: {0:?}")]
    ExtraArgument(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    /// Source file to run; the REPL reads stdin when absent.
    pub file: Option<PathBuf>,
    pub parser: ParserOptions,
    /// Print every parsed item as an indented tree.
    pub dump_ast: bool,
}

impl Config {
    /// Reads the arguments following the program name.
    ///
    /// ```text
    /// kaleidoscope [--strict-numbers] [--max-depth N] [--dump-ast] [FILE]
    /// ```
    pub fn from_args<I>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--strict-numbers" => config.parser.strict_numbers = true,
                "--dump-ast" => config.dump_ast = true,
                "--max-depth" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;

                    config.parser.max_depth = match value.parse::<usize>() {
                        Ok(depth) if depth > 0 => depth,
                        _ => return Err(ConfigError::InvalidValue { flag: arg, value }),
                    };
                }
                _ if arg.starts_with("--") => return Err(ConfigError::UnknownFlag(arg)),
                _ => {
                    if config.file.is_some() {
                        return Err(ConfigError::ExtraArgument(arg));
                    }
                    config.file = Some(PathBuf::from(arg));
                }
            }
        }

        Ok(config)
    }

    /// Name errors and positions are reported under.
    pub fn file_name(&self) -> Option<String> {
        self.file
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }
}
