//! Feature provider registration
//!
//! On-demand modules expose their entry points through explicit
//! registration at composition time. The coordinator only announces
//! that a module is installed (via `Event::Navigation`); the host
//! resolves the launch through this registry. There is no runtime
//! name-based lookup of implementation types.

use std::collections::HashMap;

use splitflow_core::prelude::*;

/// Entry point contract for an installable feature module
pub trait FeatureProvider: Send + Sync {
    /// The module name this provider serves
    fn module_name(&self) -> &str;

    /// Launch the feature. Called only after the module is installed.
    fn launch(&self) -> Result<()>;
}

/// Registry of feature providers, keyed by module name
#[derive(Default)]
pub struct FeatureRegistry {
    providers: HashMap<String, Box<dyn FeatureProvider>>,
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRegistry")
            .field("modules", &self.module_names())
            .finish()
    }
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. A later registration for the same module
    /// replaces the earlier one.
    pub fn register(&mut self, provider: Box<dyn FeatureProvider>) {
        let name = provider.module_name().to_string();
        debug!("Registering feature provider for module {}", name);
        self.providers.insert(name, provider);
    }

    pub fn contains(&self, module: &str) -> bool {
        self.providers.contains_key(module)
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Launch the feature registered for `module`
    pub fn launch(&self, module: &str) -> Result<()> {
        let provider = self
            .providers
            .get(module)
            .ok_or_else(|| Error::feature_not_registered(module))?;
        provider.launch()
    }
}
