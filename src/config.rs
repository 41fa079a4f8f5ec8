//! Command-line configuration for the perft report.

use std::path::PathBuf;

use rookery_core::STARTING_FEN;

pub const USAGE: &str =
    "usage: rookery [--cache <path>] [--divide] [--threads <n>] <depth> [<fen fields...>]";

/// Problems with the command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing depth\n{}", USAGE)]
    MissingDepth,
    #[error("invalid depth: \"{found}\"")]
    InvalidDepth { found: String },
    #[error("option {flag} needs a value")]
    MissingValue { flag: &'static str },
    #[error("invalid thread count: \"{found}\"")]
    InvalidThreads { found: String },
    #[error("unknown option: {found}\n{}", USAGE)]
    UnknownOption { found: String },
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub depth: u32,
    pub fen: String,
    pub cache: Option<PathBuf>,
    pub divide: bool,
    pub threads: usize,
}

impl Config {
    /// Parse the arguments that follow the program name.
    pub fn from_args<I, S>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);
        let mut cache = None;
        let mut divide = false;
        let mut threads = 1;
        let mut depth = None;
        let mut fen_fields = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--cache" => {
                    let path = args.next().ok_or(ConfigError::MissingValue { flag: "--cache" })?;
                    cache = Some(PathBuf::from(path));
                }
                "--divide" => divide = true,
                "--threads" => {
                    let text = args.next().ok_or(ConfigError::MissingValue { flag: "--threads" })?;
                    threads = match text.parse::<usize>() {
                        Ok(n) if n > 0 => n,
                        _ => return Err(ConfigError::InvalidThreads { found: text }),
                    };
                }
                flag if flag.starts_with("--") => {
                    return Err(ConfigError::UnknownOption { found: arg });
                }
                _ if depth.is_none() => {
                    depth = Some(
                        arg.parse::<u32>()
                            .map_err(|_| ConfigError::InvalidDepth { found: arg.clone() })?,
                    );
                }
                _ => fen_fields.push(arg),
            }
        }

        let depth = depth.ok_or(ConfigError::MissingDepth)?;
        let fen = if fen_fields.is_empty() {
            STARTING_FEN.to_string()
        } else {
            fen_fields.join(" ")
        };

        Ok(Config {
            depth,
            fen,
            cache,
            divide,
            threads,
        })
    }
}
