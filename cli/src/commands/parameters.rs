//! `aws-install parameters`: list the template's parameters.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::LocalFiles;
use crate::commands::ParametersArgs;
use crate::domain::config::resolve_template;
use crate::domain::{ConfigError, ParameterSpec, Template};
use crate::infra::fs::LocalFs;

/// Run `aws-install parameters`. Reads only local files.
///
/// # Errors
///
/// Returns an error if no template is configured or it cannot be parsed.
pub fn run(app: &AppContext, args: &ParametersArgs) -> Result<()> {
    let file = app.config.load()?;
    let config_file = app.config.path();
    let template = resolve_template(args.template.clone(), file.template, config_file)
        .ok_or_else(|| ConfigError::MissingTemplate {
            file: config_file.display().to_string(),
        })?;

    let body = LocalFs.read_template(&template)?;
    let schema = Template::parse(&body)?.parameters();
    if schema.is_empty() {
        app.output.header("No parameters");
        return Ok(());
    }

    app.output.header("Parameters");
    let width = schema.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for param in &schema {
        app.output
            .kv(&format!("{:width$}", param.name), &describe(param));
    }
    Ok(())
}

fn describe(param: &ParameterSpec) -> String {
    let requirement = match &param.default {
        Some(default) => format!("default: {default}"),
        None => "required".to_string(),
    };
    match &param.description {
        Some(description) => format!("{requirement}  {description}"),
        None => requirement,
    }
}
