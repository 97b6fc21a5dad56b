use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Deserialize;
use weave_catalog::{TypeCatalog, TypeName};

use crate::class::ClassContext;
use crate::error::ConfigurationError;
use crate::merge::{merge, ContextAmendments};
use crate::mixin::MixinContext;

/// Raw mixin configuration, keyed by the class it is declared on.
///
/// ```toml
/// [[class]]
/// target = "App.Order"
/// composed_interfaces = ["App.IAuditedOrder"]
///
/// [[class.mixin]]
/// type = "App.AuditMixin"
/// precedes = ["App.CacheMixin"]
/// ```
///
/// A class inherits the context of its base type; its own entry only
/// amends it (see [`merge`]).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "ConfigurationSource")]
pub struct MixinConfiguration {
    classes: IndexMap<TypeName, ContextAmendments>,
}

#[derive(Debug, Deserialize)]
struct ConfigurationSource {
    #[serde(default, rename = "class")]
    classes: Vec<ClassEntry>,
}

#[derive(Debug, Deserialize)]
struct ClassEntry {
    target: TypeName,
    #[serde(default)]
    clear_mixins: bool,
    #[serde(default)]
    remove: BTreeSet<TypeName>,
    #[serde(default)]
    composed_interfaces: BTreeSet<TypeName>,
    #[serde(default, rename = "mixin")]
    mixins: Vec<MixinContext>,
}

impl From<ClassEntry> for ContextAmendments {
    fn from(entry: ClassEntry) -> Self {
        ContextAmendments {
            target: entry.target,
            clear_mixins: entry.clear_mixins,
            removals: entry.remove,
            additions: entry.mixins,
            composed_interfaces: entry.composed_interfaces,
        }
    }
}

impl TryFrom<ConfigurationSource> for MixinConfiguration {
    type Error = ConfigurationError;

    fn try_from(source: ConfigurationSource) -> Result<Self, Self::Error> {
        let mut configuration = MixinConfiguration::default();
        for entry in source.classes {
            configuration.declare(entry.into())?;
        }
        Ok(configuration)
    }
}

impl MixinConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        let source: ConfigurationSource = toml::from_str(source)?;
        MixinConfiguration::try_from(source)
    }

    /// Registers the amendments declared on one class.
    pub fn declare(&mut self, amendments: ContextAmendments) -> Result<(), ConfigurationError> {
        if self.classes.contains_key(&amendments.target) {
            return Err(ConfigurationError::DuplicateClass { target: amendments.target });
        }
        self.classes.insert(amendments.target.clone(), amendments);
        Ok(())
    }

    /// Classes with an entry of their own, in declaration order.
    pub fn configured_targets(&self) -> impl Iterator<Item = &TypeName> + '_ {
        self.classes.keys()
    }

    pub fn amendments_for(&self, target: &TypeName) -> Option<&ContextAmendments> {
        self.classes.get(target)
    }

    /// The effective context of `target`: the configuration of every type
    /// on its base chain, merged from the root down.
    pub fn context_for(&self, target: &TypeName, catalog: &dyn TypeCatalog) -> Result<ClassContext, ConfigurationError> {
        let mut chain = catalog.base_chain(target);
        chain.reverse();
        let Some(root) = chain.first() else {
            return Err(ConfigurationError::UnknownType { name: target.clone(), role: "target" });
        };

        let mut context = ClassContext::empty(root.clone());
        for ty in &chain {
            let inherit = ContextAmendments::new(ty.clone());
            let amendments = self.classes.get(ty).unwrap_or(&inherit);
            context = merge(&context, amendments, catalog)?;
        }
        log::debug!("resolved context for `{}` over {} level(s)", target, chain.len());
        Ok(context)
    }
}
