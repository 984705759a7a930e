use std::path::Path;

use ddlgraph_catalog::ExtractOptions;
use ddlgraph_core::RenderOptions;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Optional `ddlgraph.toml` settings; every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub terminator: Option<String>,
    pub terminator_directive: Option<bool>,
    pub schemas: Option<Vec<String>>,
    pub include_remarks: Option<bool>,
    pub include_views: Option<bool>,
    pub include_routines: Option<bool>,
    pub include_triggers: Option<bool>,
    pub resync_identities: Option<bool>,
    pub remark_script_threshold: Option<usize>,
    pub remark_script_marker: Option<String>,
}

pub fn load_config(path: &Path) -> Result<FileConfig, CliError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|err| CliError::InvalidConfig(format!("{}: {err}", path.display())))
}

/// Command-line values that override the config file when present.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub terminator: Option<String>,
    pub schemas: Vec<String>,
    pub no_remarks: bool,
    pub no_views: bool,
    pub no_routines: bool,
    pub no_triggers: bool,
    pub no_identity_resync: bool,
    pub no_directive: bool,
}

/// Resolve defaults, then config file, then command line.
pub fn resolve(config: &FileConfig, overrides: &Overrides) -> Result<(ExtractOptions, RenderOptions), CliError> {
    let mut extract = ExtractOptions::default();
    let mut render = RenderOptions::default();

    if let Some(terminator) = &config.terminator {
        render.terminator = terminator.clone();
    }
    if let Some(directive) = config.terminator_directive {
        render.terminator_directive = directive;
    }
    if let Some(remarks) = config.include_remarks {
        render.include_remarks = remarks;
    }
    if let Some(threshold) = config.remark_script_threshold {
        render.remark_script_threshold = threshold;
    }
    if let Some(marker) = &config.remark_script_marker {
        render.remark_script_marker = marker.clone();
    }
    extract.schemas = config.schemas.clone().filter(|list| !list.is_empty());
    if let Some(views) = config.include_views {
        extract.include_views = views;
    }
    if let Some(routines) = config.include_routines {
        extract.include_routines = routines;
    }
    if let Some(triggers) = config.include_triggers {
        extract.include_triggers = triggers;
    }
    if let Some(resync) = config.resync_identities {
        extract.resync_identities = resync;
    }

    if let Some(terminator) = &overrides.terminator {
        render.terminator = terminator.clone();
    }
    if !overrides.schemas.is_empty() {
        extract.schemas = Some(overrides.schemas.clone());
    }
    if overrides.no_remarks {
        render.include_remarks = false;
    }
    if overrides.no_directive {
        render.terminator_directive = false;
    }
    if overrides.no_views {
        extract.include_views = false;
    }
    if overrides.no_routines {
        extract.include_routines = false;
    }
    if overrides.no_triggers {
        extract.include_triggers = false;
    }
    if overrides.no_identity_resync {
        extract.resync_identities = false;
    }

    if render.terminator.trim().is_empty() {
        return Err(CliError::InvalidConfig(
            "statement terminator must not be empty".to_string(),
        ));
    }
    Ok((extract, render))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_wins_over_file() {
        let config: FileConfig = toml::from_str(
            r#"
terminator = ";"
schemas = ["APP"]
include_views = false
remark_script_threshold = 200
"#,
        )
        .expect("parse config");
        let overrides = Overrides {
            terminator: Some("@".to_string()),
            schemas: vec!["SALES".to_string()],
            no_triggers: true,
            ..Overrides::default()
        };

        let (extract, render) = resolve(&config, &overrides).expect("resolve");
        assert_eq!(render.terminator, "@");
        assert_eq!(render.remark_script_threshold, 200);
        assert_eq!(extract.schemas, Some(vec!["SALES".to_string()]));
        assert!(!extract.include_views);
        assert!(!extract.include_triggers);
        assert!(extract.include_routines);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("colour = true").is_err());
    }

    #[test]
    fn empty_terminator_is_invalid() {
        let config = FileConfig {
            terminator: Some("  ".to_string()),
            ..FileConfig::default()
        };
        assert!(matches!(
            resolve(&config, &Overrides::default()),
            Err(CliError::InvalidConfig(_))
        ));
    }
}
