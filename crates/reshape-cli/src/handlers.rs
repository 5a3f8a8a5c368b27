//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

use crate::cli::{
    CheckArgs, ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs, TransformArgs,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use reshape_core::{InstanceType, SchemaDescriptor, Transformer};
use reshape_schemas::{AcceptAll, SchemaLoader};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Handle the transform command
pub fn handle_transform(
    args: TransformArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let rule_set = args
        .rule_set
        .or_else(|| config.rule_set.clone())
        .ok_or_else(|| {
            Error::invalid_args("no rule set given; pass --rule-set or set rule_set in the config")
        })?;

    let schema = load_schema(&args.schema)?;
    let mut transformer = Transformer::new(&schema, rule_set.as_str())?;

    if !transformer.descriptor().rule_sets().contains(&rule_set) {
        output.warning(&format!(
            "Schema {} declares no rules for rule set '{}'",
            args.schema.display(),
            rule_set
        ))?;
    }

    if let Some(format) = args.format.unwrap_or(config.transform.format).to_input_format() {
        transformer = transformer.with_format(format);
    }

    if args.no_validate || !config.transform.validate {
        tracing::info!("Output validation disabled");
        transformer = transformer.with_validator(AcceptAll);
    }

    let input = read_input(&args.input)?;
    let mut document = transformer.transform(&input)?;

    if args.pretty || config.transform.pretty {
        let value: Value = serde_json::from_slice(&document)?;
        document = serde_json::to_vec_pretty(&value)?;
    }

    match args.output {
        Some(path) => {
            fs::write(&path, &document)?;
            output.success(&format!("✓ Wrote {}", path.display()))?;
        }
        None => output.document(&document)?,
    }

    Ok(())
}

/// Handle the check command
pub fn handle_check(args: CheckArgs, output: &mut OutputWriter) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let descriptor = Arc::new(SchemaDescriptor::parse(&schema)?);
    let rule_sets = descriptor.rule_sets();

    if let Some(rule_set) = &args.rule_set {
        if !rule_sets.contains(rule_set) {
            return Err(Error::invalid_args(format!(
                "schema {} declares no rule set '{}'",
                args.schema.display(),
                rule_set
            )));
        }
    }

    // Also compiles the validator
    let rule_set = args.rule_set.clone().unwrap_or_default();
    Transformer::from_descriptor(Arc::clone(&descriptor), rule_set)?;

    let instances = descriptor.instances();
    output.success(&format!("✓ Schema {} is valid", args.schema.display()))?;
    output.writeln(&format!("instances: {}", instances.len()))?;
    output.writeln(&format!(
        "rule sets: {}",
        if rule_sets.is_empty() {
            "(none)".to_string()
        } else {
            rule_sets.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    ))?;

    if args.detailed {
        for instance in instances {
            output.writeln(&describe_instance(instance, args.rule_set.as_deref()))?;
        }
    }

    Ok(())
}

/// One report line: path, type, then the tiers that can produce a value
fn describe_instance(instance: &reshape_core::InstanceDescriptor, rule_set: Option<&str>) -> String {
    let mut tiers = Vec::new();
    match rule_set {
        Some(rule_set) => {
            if let Some(rule) = instance.rule(rule_set) {
                tiers.push(format!("rule({} sources, {:?})", rule.sources.len(), rule.method));
            }
        }
        None => {
            for name in instance.transforms.keys() {
                tiers.push(format!("rule:{}", name));
            }
        }
    }
    if !matches!(instance.instance_type, InstanceType::Object) {
        tiers.push("copy".to_string());
    }
    if instance.default.is_some() {
        tiers.push("default".to_string());
    }

    format!("{}  {}  {}", instance.path, instance.instance_type, tiers.join(" > "))
}

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            args.path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&args.path)?;
    output.success(&format!("✓ Created config at {}", args.path.display()))?;
    Ok(())
}

fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = match args.format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::config_with_source("Failed to serialize as TOML", e))?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    output.writeln(content.trim_end())
}

/// Load a schema file, reporting missing files distinctly
fn load_schema(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut loader = SchemaLoader::new();
    Ok(loader.load(path)?)
}

/// Read the source record from a file, or stdin for `-`
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        return Ok(buffer);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(fs::read(path)?)
}
