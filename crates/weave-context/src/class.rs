use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use weave_catalog::{TypeCatalog, TypeName};

use crate::error::ConfigurationError;
use crate::mixin::MixinContext;

/// The frozen description of one requested composition.
///
/// Mixins keep their declaration order, which the resolver uses as its
/// final tie-break. Equality and hashing, however, are structural and
/// ignore that order: two contexts naming the same target, the same mixins
/// with the same options, and the same composed interfaces are equal.
/// The `precedes`/`follows` lists inside each [`MixinContext`] remain
/// order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassContext {
    target: TypeName,
    mixins: IndexMap<TypeName, MixinContext>,
    composed_interfaces: BTreeSet<TypeName>,
}

impl ClassContext {
    /// A context without mixins. Needs no checking.
    pub fn empty(target: impl Into<TypeName>) -> Self {
        ClassContext {
            target: target.into(),
            mixins: IndexMap::new(),
            composed_interfaces: BTreeSet::new(),
        }
    }

    pub fn builder(target: impl Into<TypeName>) -> ClassContextBuilder {
        ClassContextBuilder { context: ClassContext::empty(target) }
    }

    pub(crate) fn from_parts(
        target: TypeName,
        mixins: IndexMap<TypeName, MixinContext>,
        composed_interfaces: BTreeSet<TypeName>,
    ) -> Self {
        ClassContext { target, mixins, composed_interfaces }
    }

    pub(crate) fn mixin_map(&self) -> &IndexMap<TypeName, MixinContext> {
        &self.mixins
    }

    pub fn target(&self) -> &TypeName {
        &self.target
    }

    /// Mixins in declaration order.
    pub fn mixins(&self) -> impl ExactSizeIterator<Item = &MixinContext> + '_ {
        self.mixins.values()
    }

    pub fn mixin(&self, mixin_type: &TypeName) -> Option<&MixinContext> {
        self.mixins.get(mixin_type)
    }

    pub fn contains_mixin(&self, mixin_type: &TypeName) -> bool {
        self.mixins.contains_key(mixin_type)
    }

    pub fn declaration_index(&self, mixin_type: &TypeName) -> Option<usize> {
        self.mixins.get_index_of(mixin_type)
    }

    pub fn mixin_count(&self) -> usize {
        self.mixins.len()
    }

    pub fn composed_interfaces(&self) -> &BTreeSet<TypeName> {
        &self.composed_interfaces
    }

    /// Checks the context against a catalog: every named type must exist and
    /// every composed interface must be implementable by the target or one
    /// of its mixins.
    pub fn check(&self, catalog: &dyn TypeCatalog) -> Result<(), ConfigurationError> {
        if !catalog.contains(&self.target) {
            return Err(ConfigurationError::UnknownType { name: self.target.clone(), role: "target" });
        }
        for mixin in self.mixins.keys() {
            if !catalog.contains(mixin) {
                return Err(ConfigurationError::UnknownType { name: mixin.clone(), role: "mixin" });
            }
        }
        for interface in &self.composed_interfaces {
            self.check_composed_interface(interface, catalog)?;
        }
        Ok(())
    }

    fn check_composed_interface(&self, interface: &TypeName, catalog: &dyn TypeCatalog) -> Result<(), ConfigurationError> {
        let Some(info) = catalog.lookup(interface) else {
            return Err(ConfigurationError::UnknownType { name: interface.clone(), role: "composed interface" });
        };
        if !info.is_interface() {
            return Err(ConfigurationError::ComposedInterfaceNotImplementable {
                target: self.target.clone(),
                interface: interface.clone(),
                reason: "it is not an interface".to_string(),
            });
        }
        let implemented = catalog.is_assignable(&self.target, interface)
            || self.mixins.keys().any(|mixin| catalog.is_assignable(mixin, interface));
        if !implemented {
            return Err(ConfigurationError::ComposedInterfaceNotImplementable {
                target: self.target.clone(),
                interface: interface.clone(),
                reason: "neither the target nor any of its mixins implements it".to_string(),
            });
        }
        Ok(())
    }
}

impl Hash for ClassContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
        let mut mixins: Vec<&MixinContext> = self.mixins.values().collect();
        mixins.sort_by(|a, b| a.mixin_type.cmp(&b.mixin_type));
        mixins.hash(state);
        self.composed_interfaces.hash(state);
    }
}

/// Assembles a [`ClassContext`] from raw configuration data.
#[derive(Debug, Clone)]
pub struct ClassContextBuilder {
    context: ClassContext,
}

impl ClassContextBuilder {
    /// Adds a mixin; configuring the same mixin type again folds the
    /// options together.
    pub fn mixin(mut self, mixin: MixinContext) -> Self {
        self.context
            .mixins
            .entry(mixin.mixin_type.clone())
            .and_modify(|existing| existing.merge_options(&mixin))
            .or_insert(mixin);
        self
    }

    pub fn compose(mut self, interface: impl Into<TypeName>) -> Self {
        self.context.composed_interfaces.insert(interface.into());
        self
    }

    pub fn build(self, catalog: &dyn TypeCatalog) -> Result<ClassContext, ConfigurationError> {
        self.context.check(catalog)?;
        log::debug!(
            "context for `{}`: {} mixin(s), {} composed interface(s)",
            self.context.target,
            self.context.mixins.len(),
            self.context.composed_interfaces.len()
        );
        Ok(self.context)
    }
}
