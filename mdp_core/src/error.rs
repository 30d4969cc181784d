use miette::Diagnostic;
use thiserror::Error;

/// Errors raised around the parser: reading inputs and loading configuration.
///
/// Parsing itself never fails. Malformed markdown degrades to paragraph text
/// instead of producing an error.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MdpError {
	#[error(transparent)]
	#[diagnostic(code(mdp::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdp::config_parse),
		help(
			"check that mdp.toml is valid TOML with [features], [render], [lists] and/or [cache] \
			 sections"
		)
	)]
	ConfigParse(String),

	#[error("markdown input not found: `{path}`")]
	#[diagnostic(
		code(mdp::missing_input),
		help("pass the path of an existing markdown file")
	)]
	MissingInput { path: String },
}

pub type MdpResult<T> = Result<T, MdpError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
