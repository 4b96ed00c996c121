//! `devyaml blocks`: describe the block registry.

use serde::Serialize;

use devyaml_blocks::{BLOCK_REGISTRY, BlockError, BlockSchema, FieldSpec, find_block};

use crate::{
    cli::{BlocksArgs, ListFormat},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Serialisable view of a [`BlockSchema`].
#[derive(Debug, Serialize)]
struct BlockInfo {
    name: &'static str,
    description: &'static str,
    repeated: bool,
    allow_extra: bool,
    fields: Vec<FieldInfo>,
}

#[derive(Debug, Serialize)]
struct FieldInfo {
    name: &'static str,
    required: bool,
    hint: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<String>,
}

impl From<&BlockSchema> for BlockInfo {
    fn from(schema: &BlockSchema) -> Self {
        Self {
            name: schema.name,
            description: schema.description,
            repeated: schema.repeated,
            allow_extra: schema.allow_extra,
            fields: schema.fields.iter().map(FieldInfo::from).collect(),
        }
    }
}

impl From<&FieldSpec> for FieldInfo {
    fn from(field: &FieldSpec) -> Self {
        Self {
            name: field.name,
            required: field.required,
            hint: field.hint.as_str(),
            default: field.default.map(|d| d.to_node().render()),
        }
    }
}

pub fn execute(args: BlocksArgs, output: OutputManager) -> CliResult<()> {
    let selected: Vec<&BlockSchema> = match &args.name {
        Some(name) => vec![find_block(name).ok_or_else(|| BlockError::UnknownBlock {
            block: name.clone(),
        })?],
        None => BLOCK_REGISTRY.iter().collect(),
    };

    match (args.format, args.name.is_some()) {
        (ListFormat::Json, _) => {
            let infos: Vec<BlockInfo> = selected.into_iter().map(BlockInfo::from).collect();
            let json = serde_json::to_string_pretty(&infos).with_cli_context(|| "encoding blocks")?;
            output.document(&format!("{json}\n"))?;
        }
        (ListFormat::List, false) => {
            for schema in selected {
                output.document(&format!("{}\n", schema.name))?;
            }
        }
        (ListFormat::List, true) => {
            for schema in selected {
                for field in schema.field_names() {
                    output.document(&format!("{field}\n"))?;
                }
            }
        }
        (ListFormat::Table, false) => {
            output.header("Available Blocks:")?;
            let width = selected.iter().map(|s| s.name.len()).max().unwrap_or(0);
            for schema in selected {
                let marker = if schema.repeated { " (list)" } else { "" };
                output.print(&format!(
                    "  {:width$}  {}{marker}",
                    schema.name, schema.description
                ))?;
            }
        }
        (ListFormat::Table, true) => {
            for schema in selected {
                describe(schema, &output)?;
            }
        }
    }

    Ok(())
}

fn describe(schema: &BlockSchema, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("{}: {}", schema.name, schema.description))?;
    if schema.repeated {
        output.info("Repeated: each entry becomes a list item")?;
    }

    let width = schema.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for field in schema.fields.iter().map(FieldInfo::from) {
        let presence = if field.required { "required" } else { "optional" };
        let default = field
            .default
            .map(|d| format!("  default: {d}"))
            .unwrap_or_default();
        output.print(&format!(
            "  {:width$}  {presence:8}  {}{default}",
            field.name, field.hint
        ))?;
    }
    if schema.allow_extra {
        output.print("  (platform-specific fields are passed through)")?;
    }
    Ok(())
}
