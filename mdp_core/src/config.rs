use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::MdpError;
use crate::MdpResult;
use crate::options::Features;
use crate::options::ListOptions;
use crate::options::ParseOptions;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["mdp.toml", ".mdp.toml", ".config/mdp.toml"];

/// Configuration loaded from an `mdp.toml` file. Every section and field is
/// optional.
///
/// ```toml
/// [features]
/// horizontal_rules = false
///
/// [render]
/// line_markers = true
///
/// [lists]
/// nest_single_space = false
///
/// [cache]
/// enabled = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdpConfig {
	/// Which block constructs are recognized.
	pub features: Features,
	pub render: RenderConfig,
	pub lists: ListOptions,
	pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
	/// Write `data-line` attributes on emitted elements. Defaults to `true`.
	pub line_markers: bool,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self { line_markers: true }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
	/// Reuse built list trees for repeated runs of list items. Defaults to
	/// `true`.
	pub enabled: bool,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self { enabled: true }
	}
}

impl MdpConfig {
	/// Resolve the first config file path that exists at `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MdpResult<Option<MdpConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> MdpResult<MdpConfig> {
		toml::from_str(content).map_err(|e| MdpError::ConfigParse(e.to_string()))
	}

	/// The parser options this config describes.
	pub fn parse_options(&self) -> ParseOptions {
		ParseOptions {
			features: self.features,
			lists: self.lists,
			line_markers: self.render.line_markers,
			cache: self.cache.enabled,
		}
	}
}
