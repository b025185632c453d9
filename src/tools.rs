//! The tool surface: names, descriptions and JSON input schemas of the cleaning operations, and
//! dispatch of JSON argument objects to a [`Cleaner`].
//!
//! Tool results are plain text. Failures of the operation itself are rendered as text starting
//! with `Error` rather than surfaced as protocol errors; only an unknown tool name is an `Err`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::cleaner::Cleaner;
use crate::error::CleaningError;
use crate::processing::{ColumnSelection, FillStrategy, FilterOperator, Keep, StringOp};

/// Error returned by [`CleaningTools::call`].
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// The tools exposed by [`CleaningTools`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    InspectCsv,
    RemoveNullRows,
    FillMissingValues,
    RemoveDuplicates,
    StandardizeColumns,
    FilterRows,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::InspectCsv,
        Tool::RemoveNullRows,
        Tool::FillMissingValues,
        Tool::RemoveDuplicates,
        Tool::StandardizeColumns,
        Tool::FilterRows,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Wire name of the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::InspectCsv => "inspect_csv",
            Tool::RemoveNullRows => "remove_null_rows",
            Tool::FillMissingValues => "fill_missing_values",
            Tool::RemoveDuplicates => "remove_duplicates",
            Tool::StandardizeColumns => "standardize_columns",
            Tool::FilterRows => "filter_rows",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Tool::InspectCsv => {
                "Inspect a CSV file to show basic information, missing values, and data types. \
                 Returns a JSON report."
            }
            Tool::RemoveNullRows => {
                "Remove rows with null values from a CSV. Checks all columns unless columns are \
                 given. Returns a preview unless output_path is set."
            }
            Tool::FillMissingValues => {
                "Fill missing values in a CSV using a strategy: mean, median, mode, forward, \
                 backward or constant (requires fill_value)."
            }
            Tool::RemoveDuplicates => {
                "Remove duplicate rows from a CSV, comparing all columns unless columns are given. \
                 keep selects which occurrence survives: first, last or none."
            }
            Tool::StandardizeColumns => {
                "Standardize column values: lower, upper, trim or title case. Applies to all text \
                 columns unless columns are given."
            }
            Tool::FilterRows => {
                "Filter rows on a condition. Operators: equals, not_equals, greater, less, \
                 contains, not_contains."
            }
        }
    }

    fn input_schema(&self) -> JsonValue {
        let csv_path = json!({
            "type": "string",
            "description": "Path to the CSV file or CSV string content"
        });
        let output_path = json!({
            "type": "string",
            "description": "Path to save the result (optional, returns a preview if not provided)"
        });
        match self {
            Tool::InspectCsv => json!({
                "type": "object",
                "properties": { "csv_path": csv_path },
                "required": ["csv_path"]
            }),
            Tool::RemoveNullRows => json!({
                "type": "object",
                "properties": {
                    "csv_path": csv_path,
                    "columns": {
                        "type": "string",
                        "description": "Comma-separated column names to check for nulls (optional, checks all if not provided)"
                    },
                    "output_path": output_path
                },
                "required": ["csv_path"]
            }),
            Tool::FillMissingValues => json!({
                "type": "object",
                "properties": {
                    "csv_path": csv_path,
                    "strategy": {
                        "type": "string",
                        "enum": ["mean", "median", "mode", "forward", "backward", "constant"]
                    },
                    "columns": {
                        "type": "string",
                        "description": "Comma-separated column names to fill (optional, all columns if not provided)"
                    },
                    "fill_value": {
                        "type": "string",
                        "description": "Value to use when strategy is 'constant'"
                    },
                    "output_path": output_path
                },
                "required": ["csv_path", "strategy"]
            }),
            Tool::RemoveDuplicates => json!({
                "type": "object",
                "properties": {
                    "csv_path": csv_path,
                    "columns": {
                        "type": "string",
                        "description": "Comma-separated column names to compare (optional, compares all if not provided)"
                    },
                    "keep": {
                        "type": "string",
                        "enum": ["first", "last", "none"],
                        "default": "first"
                    },
                    "output_path": output_path
                },
                "required": ["csv_path"]
            }),
            Tool::StandardizeColumns => json!({
                "type": "object",
                "properties": {
                    "csv_path": csv_path,
                    "operation": {
                        "type": "string",
                        "enum": ["lower", "upper", "trim", "title"]
                    },
                    "columns": {
                        "type": "string",
                        "description": "Comma-separated column names (optional, all text columns if not provided)"
                    },
                    "output_path": output_path
                },
                "required": ["csv_path", "operation"]
            }),
            Tool::FilterRows => json!({
                "type": "object",
                "properties": {
                    "csv_path": csv_path,
                    "column": { "type": "string", "description": "Column name to filter on" },
                    "operator": {
                        "type": "string",
                        "enum": ["equals", "not_equals", "greater", "less", "contains", "not_contains"]
                    },
                    "value": { "type": "string", "description": "Value to compare against" },
                    "output_path": output_path
                },
                "required": ["csv_path", "column", "operator", "value"]
            }),
        }
    }

    /// Phrase used in `Error <context>: ...` messages.
    fn error_context(&self) -> &'static str {
        match self {
            Tool::InspectCsv => "inspecting CSV",
            Tool::RemoveNullRows => "removing null rows",
            Tool::FillMissingValues => "filling missing values",
            Tool::RemoveDuplicates => "removing duplicates",
            Tool::StandardizeColumns => "standardizing columns",
            Tool::FilterRows => "filtering rows",
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

#[derive(Debug, Deserialize)]
struct InspectArgs {
    csv_path: String,
}

#[derive(Debug, Deserialize)]
struct RemoveNullRowsArgs {
    csv_path: String,
    columns: Option<String>,
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FillArgs {
    csv_path: String,
    strategy: String,
    columns: Option<String>,
    fill_value: Option<Scalar>,
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DedupArgs {
    csv_path: String,
    columns: Option<String>,
    #[serde(default = "default_keep")]
    keep: String,
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StandardizeArgs {
    csv_path: String,
    operation: String,
    columns: Option<String>,
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilterArgs {
    csv_path: String,
    column: String,
    operator: String,
    value: Scalar,
    output_path: Option<String>,
}

fn default_keep() -> String {
    "first".to_string()
}

/// A comparison or fill value; clients may send numbers and booleans as well as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// An empty destination means "no destination".
fn destination(path: Option<String>) -> Option<PathBuf> {
    path.filter(|p| !p.trim().is_empty()).map(PathBuf::from)
}

#[derive(Debug, Error)]
enum CallFailure {
    #[error("invalid arguments: {0}")]
    Arguments(#[from] serde_json::Error),
    #[error(transparent)]
    Cleaning(#[from] CleaningError),
    #[error("failed to render report: {0}")]
    Render(#[source] serde_json::Error),
}

/// Dispatches tool calls to a [`Cleaner`] and renders the results as text.
#[derive(Debug, Clone, Default)]
pub struct CleaningTools {
    cleaner: Cleaner,
}

impl CleaningTools {
    pub fn new(cleaner: Cleaner) -> Self {
        Self { cleaner }
    }

    /// Definitions of every tool, in a stable order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        Tool::ALL.iter().map(Tool::definition).collect()
    }

    /// Run the tool `name` with a JSON `arguments` object.
    ///
    /// Returns the tool's text result, which starts with `Error` when the operation failed.
    pub fn call(&self, name: &str, arguments: &JsonValue) -> Result<String, ToolError> {
        let tool = Tool::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_owned()))?;
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments.clone()
        };

        Ok(match self.dispatch(tool, arguments) {
            Ok(text) => text,
            Err(failure) => {
                tracing::warn!(tool = tool.name(), error = %failure, "tool call failed");
                render_failure(tool, &failure)
            }
        })
    }

    fn dispatch(&self, tool: Tool, arguments: JsonValue) -> Result<String, CallFailure> {
        let text = match tool {
            Tool::InspectCsv => {
                let args: InspectArgs = serde_json::from_value(arguments)?;
                let report = self.cleaner.inspect(&args.csv_path)?;
                report.to_json_pretty().map_err(CallFailure::Render)?
            }
            Tool::RemoveNullRows => {
                let args: RemoveNullRowsArgs = serde_json::from_value(arguments)?;
                let columns = ColumnSelection::parse(args.columns.as_deref());
                let dest = destination(args.output_path);
                self.cleaner
                    .drop_nulls(&args.csv_path, &columns, dest.as_deref())?
                    .to_string()
            }
            Tool::FillMissingValues => {
                let args: FillArgs = serde_json::from_value(arguments)?;
                let fill_value = args.fill_value.map(Scalar::into_text);
                let strategy = FillStrategy::parse(&args.strategy, fill_value.as_deref())?;
                let columns = ColumnSelection::parse(args.columns.as_deref());
                let dest = destination(args.output_path);
                self.cleaner
                    .fill_nulls(&args.csv_path, &strategy, &columns, dest.as_deref())?
                    .to_string()
            }
            Tool::RemoveDuplicates => {
                let args: DedupArgs = serde_json::from_value(arguments)?;
                let keep = Keep::parse(&args.keep)?;
                let columns = ColumnSelection::parse(args.columns.as_deref());
                let dest = destination(args.output_path);
                self.cleaner
                    .dedup(&args.csv_path, &columns, keep, dest.as_deref())?
                    .to_string()
            }
            Tool::StandardizeColumns => {
                let args: StandardizeArgs = serde_json::from_value(arguments)?;
                let op = StringOp::parse(&args.operation)?;
                let columns = ColumnSelection::parse(args.columns.as_deref());
                let dest = destination(args.output_path);
                self.cleaner
                    .standardize(&args.csv_path, op, &columns, dest.as_deref())?
                    .to_string()
            }
            Tool::FilterRows => {
                let args: FilterArgs = serde_json::from_value(arguments)?;
                let op = FilterOperator::parse(&args.operator)?;
                let value = args.value.into_text();
                let dest = destination(args.output_path);
                self.cleaner
                    .filter_rows(&args.csv_path, &args.column, op, &value, dest.as_deref())?
                    .to_string()
            }
        };
        Ok(text)
    }
}

fn render_failure(tool: Tool, failure: &CallFailure) -> String {
    match failure {
        CallFailure::Arguments(_) => format!("Error: {failure}"),
        CallFailure::Cleaning(e) if e.is_argument_error() => format!("Error: {e}"),
        other => format!("Error {}: {other}", tool.error_context()),
    }
}
