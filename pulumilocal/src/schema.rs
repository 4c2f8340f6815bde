//! Provider schema introspection.
//!
//! Discovers which service endpoints the AWS provider in use by a project
//! lets us override. The list comes from the provider's own package schema,
//! so it tracks whatever provider version the project has installed.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tool::{ToolCommand, ToolRunner};

/// Name of the provider plugin whose endpoints are overridden.
pub const PROVIDER: &str = "aws";

/// Schema type holding one property per overridable service endpoint.
pub const ENDPOINTS_TYPE: &str = "aws:config/endpoints:endpoints";

#[derive(Debug, Deserialize)]
struct AboutReport {
    #[serde(default)]
    plugins: Option<Vec<PluginInfo>>,
}

#[derive(Debug, Deserialize)]
struct PluginInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// Extracts the version of the `aws` plugin from `pulumi about --json`.
///
/// Output that cannot be parsed, or that lacks the plugin or its version,
/// yields `None` so the caller falls back to an unpinned schema request.
///
/// # Examples
///
/// ```
/// use pulumilocal::schema::plugin_version;
///
/// let about = r#"{"plugins": [{"name": "aws", "version": "6.22.0"}]}"#;
/// assert_eq!(plugin_version(about).as_deref(), Some("6.22.0"));
/// assert_eq!(plugin_version("not json"), None);
/// ```
#[must_use]
pub fn plugin_version(about_json: &str) -> Option<String> {
    let report: AboutReport = match serde_json::from_str(about_json) {
        Ok(report) => report,
        Err(err) => {
            log::debug!("unparseable `about` output, using unpinned schema: {err}");
            return None;
        }
    };

    report
        .plugins
        .unwrap_or_default()
        .into_iter()
        .find(|plugin| plugin.name.as_deref() == Some(PROVIDER))
        .and_then(|plugin| plugin.version)
        .map(|version| version.trim().to_string())
        .filter(|version| !version.is_empty())
}

/// Extracts endpoint service names from a provider schema, in document order.
///
/// # Errors
///
/// Returns [`Error::Json`] if the schema is not JSON, or
/// [`Error::MalformedSchema`] if it has no endpoints type.
///
/// # Examples
///
/// ```
/// use pulumilocal::schema::endpoint_names;
///
/// let schema = r#"{"types": {"aws:config/endpoints:endpoints": {
///     "properties": {"s3": {}, "sqs": {}, "dynamodb": {}}}}}"#;
/// assert_eq!(endpoint_names(schema).unwrap(), vec!["s3", "sqs", "dynamodb"]);
/// ```
pub fn endpoint_names(schema_json: &str) -> Result<Vec<String>> {
    let schema: Value = serde_json::from_str(schema_json)?;
    let properties = schema
        .get("types")
        .and_then(|types| types.get(ENDPOINTS_TYPE))
        .and_then(|endpoints| endpoints.get("properties"))
        .and_then(Value::as_object)
        .ok_or_else(|| Error::MalformedSchema {
            reason: format!("no properties found for type '{ENDPOINTS_TYPE}'"),
        })?;

    Ok(properties.keys().cloned().collect())
}

/// Queries the wrapped tool for the provider's overridable endpoints.
pub struct SchemaIntrospector<'a, R: ToolRunner + ?Sized> {
    runner: &'a R,
}

impl<'a, R: ToolRunner + ?Sized> SchemaIntrospector<'a, R> {
    /// Creates an introspector that runs commands through `runner`.
    #[must_use]
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Returns the installed `aws` plugin version for the project at `cwd`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolFailed`] if `pulumi about` exits non-zero.
    pub fn provider_version(&self, cwd: &Path) -> Result<Option<String>> {
        let cmd = ToolCommand::captured(["about", "--json"]).with_cwd(cwd);
        let output = self.runner.run(&cmd)?.check(&cmd)?;
        Ok(plugin_version(&output.stdout))
    }

    /// Returns the overridable endpoint service names, in schema order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolFailed`] if either invoked subcommand exits
    /// non-zero, or a schema error if the schema cannot be interpreted.
    pub fn endpoint_services(&self, cwd: &Path) -> Result<Vec<String>> {
        let package = match self.provider_version(cwd)? {
            Some(version) => format!("{PROVIDER}@{version}"),
            None => PROVIDER.to_string(),
        };
        log::debug!("fetching schema for {package}");

        let cmd = ToolCommand::captured(["package", "get-schema", package.as_str()]).with_cwd(cwd);
        let output = self.runner.run(&cmd)?.check(&cmd)?;
        endpoint_names(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{ScriptedRunner, ToolOutput};
    use mockall::mock;
    use mockall::predicate::function;

    mock! {
        Runner {}
        impl ToolRunner for Runner {
            fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
        }
    }

    const SCHEMA: &str = r#"{
        "name": "aws",
        "types": {
            "aws:config/endpoints:endpoints": {
                "type": "object",
                "properties": {
                    "s3": {"type": "string"},
                    "sqs": {"type": "string"},
                    "dynamodb": {"type": "string"}
                }
            }
        }
    }"#;

    #[test]
    fn test_plugin_version_ignores_other_plugins() {
        let about = r#"{"plugins": [
            {"name": "random", "version": "4.0.0"},
            {"name": "aws", "version": " 6.1.0 "}
        ]}"#;
        assert_eq!(plugin_version(about).as_deref(), Some("6.1.0"));
    }

    #[test]
    fn test_plugin_version_tolerates_missing_data() {
        assert_eq!(plugin_version(r#"{"plugins": null}"#), None);
        assert_eq!(plugin_version(r#"{}"#), None);
        assert_eq!(plugin_version(r#"{"plugins": [{"name": "aws"}]}"#), None);
        assert_eq!(
            plugin_version(r#"{"plugins": [{"name": "aws", "version": ""}]}"#),
            None
        );
        assert_eq!(plugin_version(""), None);
    }

    #[test]
    fn test_endpoint_names_preserve_document_order() {
        assert_eq!(
            endpoint_names(SCHEMA).unwrap(),
            vec!["s3", "sqs", "dynamodb"]
        );
    }

    #[test]
    fn test_endpoint_names_missing_type() {
        let err = endpoint_names(r#"{"types": {}}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedSchema { .. }));
        assert!(endpoint_names("[").is_err());
    }

    #[test]
    fn test_schema_pinned_to_discovered_version() {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .with(function(|cmd: &ToolCommand| cmd.starts_with(&["about", "--json"])))
            .times(1)
            .returning(|_| {
                Ok(ToolOutput::success(
                    r#"{"plugins": [{"name": "aws", "version": "6.22.0"}]}"#,
                ))
            });
        runner
            .expect_run()
            .with(function(|cmd: &ToolCommand| {
                cmd.starts_with(&["package", "get-schema", "aws@6.22.0"])
            }))
            .times(1)
            .returning(|_| Ok(ToolOutput::success(SCHEMA)));

        let services = SchemaIntrospector::new(&runner)
            .endpoint_services(Path::new("/work"))
            .unwrap();
        assert_eq!(services, vec!["s3", "sqs", "dynamodb"]);
    }

    #[test]
    fn test_schema_unpinned_when_version_unknown() {
        let runner = ScriptedRunner::new()
            .respond(&["about"], ToolOutput::success("garbage"))
            .respond(&["package", "get-schema"], ToolOutput::success(SCHEMA));

        SchemaIntrospector::new(&runner)
            .endpoint_services(Path::new("/work"))
            .unwrap();

        let schema_calls = runner.calls_matching(&["package", "get-schema"]);
        assert_eq!(schema_calls.len(), 1);
        assert_eq!(schema_calls[0].args, vec!["package", "get-schema", "aws"]);
        assert_eq!(schema_calls[0].cwd.as_deref(), Some(Path::new("/work")));
    }

    #[test]
    fn test_about_failure_propagates_exit_code() {
        let runner =
            ScriptedRunner::new().respond(&["about"], ToolOutput::failure(255, "no project"));

        let err = SchemaIntrospector::new(&runner)
            .endpoint_services(Path::new("/work"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 255);
        assert!(runner.calls_matching(&["package"]).is_empty());
    }

    #[test]
    fn test_get_schema_failure_propagates_exit_code() {
        let runner = ScriptedRunner::new()
            .respond(&["about"], ToolOutput::success("{}"))
            .respond(&["package"], ToolOutput::failure(3, "plugin missing"));

        let err = SchemaIntrospector::new(&runner)
            .endpoint_services(Path::new("/work"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
