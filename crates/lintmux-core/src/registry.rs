//! Registry of runnable tools.

use crate::tool::{ToolDescriptor, ToolRunner};
use std::sync::Arc;

/// Shared handle to a tool runner.
pub type ToolBox = Arc<dyn ToolRunner>;

/// Ordered collection of tools available to a run.
///
/// Built once at startup (built-ins plus any plugin tools) and handed to the
/// scheduler. Registration order is the order tasks are built in.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolBox>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    ///
    /// A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: ToolBox) {
        let name = tool.descriptor().name.clone();
        if let Some(slot) = self
            .tools
            .iter_mut()
            .find(|t| t.descriptor().name == name)
        {
            tracing::debug!("Replacing registered tool: {}", name);
            *slot = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Registers a tool, builder style.
    #[must_use]
    pub fn with(mut self, tool: impl ToolRunner + 'static) -> Self {
        self.register(Arc::new(tool));
        self
    }

    /// Looks a tool up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolBox> {
        self.tools.iter().find(|t| t.descriptor().name == name)
    }

    /// Iterates over the tools registered for a language.
    pub fn for_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a ToolBox> {
        self.tools
            .iter()
            .filter(move |t| t.descriptor().language == language)
    }

    /// Iterates over all descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor())
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.descriptors().map(|d| &d.name))
            .finish()
    }
}
