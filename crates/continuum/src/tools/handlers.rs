use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::memory::MemoryQuery;
use crate::status::StatusReport;
use crate::storage::{DocumentKind, Profile, Scope};
use crate::tools::{RememberArgs, ToolCall, ToolOutput};

/// Executes tool calls against one profile
#[derive(Debug, Clone)]
pub struct ToolHandler {
    profile: Profile,
    config: Config,
}

impl ToolHandler {
    pub fn new(profile: Profile, config: Config) -> Self {
        Self { profile, config }
    }

    /// Handler for `profile` with the configuration that applies to it
    pub fn for_profile(profile: Profile) -> Self {
        let config = profile.load_config();
        Self::new(profile, config)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Parse and run a call by name. Parse failures become error outputs.
    pub fn dispatch(&self, name: &str, arguments: Value, now: DateTime<Local>) -> ToolOutput {
        match ToolCall::parse(name, arguments) {
            Ok(call) => self.call(&call, now),
            Err(e) => {
                warn!("Rejected tool call {name}: {e}");
                ToolOutput::error(e.to_string())
            }
        }
    }

    /// Run a parsed call. Failures are reported in the output, never raised.
    pub fn call(&self, call: &ToolCall, now: DateTime<Local>) -> ToolOutput {
        debug!("Handling tool call: {}", call.name());
        let result = match call {
            ToolCall::GetContext => self.get_context(now),
            ToolCall::GetIdentity => self.get_identity(),
            ToolCall::GetVoice => self.get_voice(),
            ToolCall::GetCurrentContext => self.get_current_context(),
            ToolCall::GetMemories(query) => self.get_memories(query),
            ToolCall::Remember(args) => self.remember(args, now),
            ToolCall::GetStatus => self.get_status(now),
        };

        result.unwrap_or_else(|e| {
            warn!("Tool call {} failed: {e}", call.name());
            ToolOutput::error(format!("Error: {e}"))
        })
    }

    fn get_context(&self, now: DateTime<Local>) -> Result<ToolOutput> {
        let export = self.profile.generate_export(&self.config, now)?;
        Ok(ToolOutput::text(export))
    }

    fn get_identity(&self) -> Result<ToolOutput> {
        Ok(match self.profile.read(DocumentKind::Identity, Scope::Global)? {
            Some(text) => ToolOutput::text(text),
            None => ToolOutput::text("Identity not configured. Run `continuum init` to set up."),
        })
    }

    fn get_voice(&self) -> Result<ToolOutput> {
        Ok(match self.profile.read_effective(DocumentKind::Voice)? {
            Some(text) => ToolOutput::text(text),
            None => ToolOutput::text("Voice profile not configured."),
        })
    }

    fn get_current_context(&self) -> Result<ToolOutput> {
        let global = self.profile.read(DocumentKind::Context, Scope::Global)?;
        let project = self.profile.read(DocumentKind::Context, Scope::Project)?;

        let mut parts = Vec::new();
        if let Some(text) = global {
            parts.push("# Global Context\n".to_string());
            parts.push(text);
        }
        if let Some(text) = project {
            parts.push("\n\n# Project Context\n".to_string());
            parts.push(text);
        }

        if parts.is_empty() {
            Ok(ToolOutput::text("No context configured."))
        } else {
            Ok(ToolOutput::text(parts.concat()))
        }
    }

    fn get_memories(&self, query: &MemoryQuery) -> Result<ToolOutput> {
        let documents = [
            self.profile.read(DocumentKind::Memory, Scope::Global)?,
            self.profile.read(DocumentKind::Memory, Scope::Project)?,
        ];
        let lines = query.run(documents.iter().flatten().map(String::as_str));

        if lines.is_empty() {
            Ok(ToolOutput::text("No memories found matching criteria."))
        } else {
            Ok(ToolOutput::text(lines.join("\n")))
        }
    }

    fn remember(&self, args: &RememberArgs, now: DateTime<Local>) -> Result<ToolOutput> {
        if args.text.trim().is_empty() {
            return Ok(ToolOutput::error("Error: text is required"));
        }

        let (scope, label) = if args.project && self.profile.has_project() {
            (Scope::Project, "project memory")
        } else {
            (Scope::Global, "global memory")
        };

        let entry = self
            .profile
            .remember(scope, &args.text, Some(args.category), now.date_naive())?;
        Ok(ToolOutput::text(format!("Saved to {label}: {entry}")))
    }

    fn get_status(&self, now: DateTime<Local>) -> Result<ToolOutput> {
        let report = StatusReport::collect(&self.profile, &self.config, now)?;
        Ok(ToolOutput::text(report.to_string()))
    }
}
