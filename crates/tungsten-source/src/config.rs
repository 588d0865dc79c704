use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tungsten.toml";

/// Configuration of a whole compiler run.
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Lexer settings
    pub lexer: LexerConfig,

    /// Parser settings
    pub parser: ParserConfig,

    /// How diagnostics are reported
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LexerConfig {
    /// Number of columns a tab character advances
    pub tab_width: u32,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self { tab_width: 1 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Maximum nesting of expressions, statements and blocks
    pub max_depth: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: default_max_depth() }
    }
}

/// Largest accepted `parser.max_depth`. Trees this deep still fit the default
/// thread stack.
pub const MAX_PARSER_DEPTH: u32 = 1024;

pub fn default_max_depth() -> u32 {
    128
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    pub format: DiagnosticFormat,

    pub color: ColorChoice,

    /// Exit with a failure status when any error was reported
    pub deny_errors: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticFormat {
    /// One `tungsten: error: ...` line per diagnostic
    #[default]
    Plain,
    /// miette's graphical output with a source snippet
    Rich,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl CompilerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the values serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lexer.tab_width == 0 {
            return Err(ConfigError::Invalid {
                field: "lexer.tab_width",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.parser.max_depth == 0 || self.parser.max_depth > MAX_PARSER_DEPTH {
            return Err(ConfigError::Invalid {
                field: "parser.max_depth",
                reason: format!("must be between 1 and {MAX_PARSER_DEPTH}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.lexer.tab_width, 1);
        assert_eq!(config.parser.max_depth, 128);
        assert_eq!(config.diagnostics.format, DiagnosticFormat::Plain);
        assert!(!config.diagnostics.deny_errors);
    }

    #[test]
    fn test_partial_config() {
        let config = CompilerConfig::from_toml_str(
            r#"
[lexer]
tab_width = 4

[diagnostics]
format = "rich"
color = "never"
deny_errors = true
"#,
        )
        .unwrap();
        assert_eq!(config.lexer.tab_width, 4);
        assert_eq!(config.parser.max_depth, 128);
        assert_eq!(config.diagnostics.format, DiagnosticFormat::Rich);
        assert_eq!(config.diagnostics.color, ColorChoice::Never);
        assert!(config.diagnostics.deny_errors);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = CompilerConfig::from_toml_str("[codegen]\nopt = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_tab_width_rejected() {
        let err = CompilerConfig::from_toml_str("[lexer]\ntab_width = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "lexer.tab_width", .. }));
    }

    #[test]
    fn test_max_depth_bounds() {
        let err = CompilerConfig::from_toml_str("[parser]\nmax_depth = 10000000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "parser.max_depth", .. }));
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for `parser.max_depth`: must be between 1 and 1024"
        );

        let err = CompilerConfig::from_toml_str("[parser]\nmax_depth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "parser.max_depth", .. }));

        let config = CompilerConfig::from_toml_str("[parser]\nmax_depth = 1024\n").unwrap();
        assert_eq!(config.parser.max_depth, MAX_PARSER_DEPTH);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompilerConfig::load(&dir.path().join("tungsten.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[parser]\nmax_depth = 16\n").unwrap();
        let config = CompilerConfig::load(&path).unwrap();
        assert_eq!(config.parser.max_depth, 16);
    }
}
