//! Schema file loading and the `schema` command.
//!
//! The schema file describes the filterable columns and, optionally, the rows
//! whose values are offered as suggestions. It is located at
//! ~/.config/fbx/schema.toml unless `--schema` or `FBX_SCHEMA` says otherwise.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use filterbox::query::FilterQueryParser;
use filterbox::schema::{ColumnOption, ColumnType, GridSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{CommandContext, CommandError, Result};
use crate::output;

/// Current schema file version. Increment when making breaking changes.
const SCHEMA_VERSION: u32 = 1;

/// Starter schema written by `fbx schema init`.
const DEFAULT_SCHEMA: &str = r#"# fbx - filter query schema

# Schema file version (do not modify)
version = 1

# Optional JSON file holding an array of row objects. Distinct values found
# there are offered as value suggestions. Relative paths resolve against the
# directory of this file.
# data_file = "rows.json"

# Each column is one category. Queries may refer to it by `field` or by
# `display_text`. `type` is one of text, number, boolean, date, selection.
# `operators` replaces the default set (==, !=, <>, contains, !contains, in).

[[columns]]
field = "name"
display_text = "Name"
type = "text"

[[columns]]
field = "status"
type = "selection"
operators = ["==", "!=", "in"]

[[columns]]
field = "active"
type = "boolean"

# Inline rows, merged with the rows from data_file.

[[rows]]
name = "Alice"
status = "open"
active = true

[[rows]]
name = "Bob"
status = "closed"
active = false
"#;

/// Schema file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Schema file version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// JSON file with row objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Filterable columns, in suggestion order.
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,

    /// Inline row objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<toml::Table>,
}

/// Returns the current schema version (used by serde default).
fn default_version() -> u32 {
    SCHEMA_VERSION
}

/// One `[[columns]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Field name in row objects.
    pub field: String,

    /// Label shown to users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,

    /// Column type.
    #[serde(default, rename = "type")]
    pub column_type: ColumnType,

    /// Custom operator set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<String>>,
}

impl ColumnConfig {
    fn to_option(&self) -> ColumnOption {
        let mut option = ColumnOption::new(&self.field).column_type(self.column_type);
        if let Some(display_text) = &self.display_text {
            option = option.display_text(display_text);
        }
        if let Some(operators) = &self.operators {
            option = option.operators(operators.clone());
        }
        option
    }
}

impl SchemaConfig {
    /// Builds the grid schema, reading `data_file` relative to `base_dir`.
    pub fn to_grid(&self, base_dir: &Path) -> Result<GridSchema> {
        let mut rows: Vec<Value> = self
            .rows
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?;

        if let Some(data_file) = &self.data_file {
            let path = base_dir.join(data_file);
            rows.extend(read_rows(&path)?);
        }

        let columns = self.columns.iter().map(ColumnConfig::to_option).collect();
        Ok(GridSchema::new(columns, &rows)?)
    }
}

/// Reads a JSON array of rows.
fn read_rows(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CommandError::Config(format!(
            "Failed to read data file {}: {}",
            path.display(),
            e
        ))
    })?;

    match serde_json::from_str(&content)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(CommandError::Config(format!(
            "Data file {} must contain a JSON array of row objects",
            path.display()
        ))),
    }
}

/// Gets the default schema directory.
/// Uses XDG-style paths: ~/.config/fbx/ on all platforms.
fn get_schema_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("fbx"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("fbx"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the schema file path: `--schema`/`FBX_SCHEMA`, else the default.
pub fn get_schema_path(ctx: &CommandContext) -> Result<PathBuf> {
    if let Some(path) = &ctx.schema_path {
        return Ok(path.clone());
    }

    Ok(get_schema_dir()?.join("schema.toml"))
}

/// Loads the schema file at `path`.
pub fn load_schema_config(path: &Path) -> Result<SchemaConfig> {
    if !path.exists() {
        return Err(CommandError::Config(format!(
            "No schema file at {}. Run 'fbx schema init' to create one.",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read schema: {}", e)))?;

    let config: SchemaConfig = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse schema: {}", e)))?;

    migrate_schema(config)
}

/// Migrates a schema file to the current version if needed.
fn migrate_schema(mut config: SchemaConfig) -> Result<SchemaConfig> {
    // Version 1 is the initial version.
    config.version = SCHEMA_VERSION;
    Ok(config)
}

/// Loads and builds the schema, failing if there is none.
pub fn load_grid(ctx: &CommandContext) -> Result<GridSchema> {
    let path = get_schema_path(ctx)?;
    let config = load_schema_config(&path)?;
    let base_dir = path.parent().unwrap_or(Path::new("."));

    let grid = config.to_grid(base_dir)?;
    debug!(path = %path.display(), "loaded schema");
    Ok(grid)
}

/// Loads the schema if its file exists.
pub fn try_load_grid(ctx: &CommandContext) -> Result<Option<GridSchema>> {
    let path = get_schema_path(ctx)?;
    if !path.exists() {
        debug!(path = %path.display(), "no schema file, using defaults");
        return Ok(None);
    }
    load_grid(ctx).map(Some)
}

/// A parser using the schema's operator words when a schema file exists.
pub fn load_parser(ctx: &CommandContext) -> Result<FilterQueryParser> {
    Ok(match try_load_grid(ctx)? {
        Some(grid) => FilterQueryParser::for_schema(&grid),
        None => FilterQueryParser::new(),
    })
}

/// Executes the schema path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_schema_path(ctx)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the schema init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_schema_path(ctx)?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Schema file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create schema directory: {}", e))
        })?;
    }

    fs::write(&path, DEFAULT_SCHEMA)
        .map_err(|e| CommandError::Config(format!("Failed to write schema: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "created",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created schema at {}", path.display());
    }

    Ok(())
}

/// Executes the schema show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_schema_path(ctx)?;
    let grid = load_grid(ctx)?;

    if ctx.json_output {
        let output = output::format_columns_json(&path, &grid)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", output::format_columns_table(&path, &grid, ctx.use_colors));
    }

    Ok(())
}
