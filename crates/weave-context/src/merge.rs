use std::collections::BTreeSet;

use weave_catalog::{TypeCatalog, TypeName};

use crate::class::ClassContext;
use crate::error::ConfigurationError;
use crate::mixin::MixinContext;

/// What a derived type changes about the context it inherits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAmendments {
    pub target: TypeName,
    pub clear_mixins: bool,
    pub removals: BTreeSet<TypeName>,
    pub additions: Vec<MixinContext>,
    pub composed_interfaces: BTreeSet<TypeName>,
}

impl ContextAmendments {
    /// Amendments that change nothing: the derived type simply inherits.
    pub fn new(target: impl Into<TypeName>) -> Self {
        ContextAmendments {
            target: target.into(),
            clear_mixins: false,
            removals: BTreeSet::new(),
            additions: Vec::new(),
            composed_interfaces: BTreeSet::new(),
        }
    }

    pub fn clear(mut self) -> Self {
        self.clear_mixins = true;
        self
    }

    pub fn remove(mut self, mixin: impl Into<TypeName>) -> Self {
        self.removals.insert(mixin.into());
        self
    }

    pub fn add(mut self, mixin: MixinContext) -> Self {
        self.additions.push(mixin);
        self
    }

    pub fn compose(mut self, interface: impl Into<TypeName>) -> Self {
        self.composed_interfaces.insert(interface.into());
        self
    }
}

/// Merges a derived type's amendments onto its base type's context.
///
/// Amendments are applied in a fixed sequence: clear (if requested), then
/// removals, then additions, each keyed by mixin type. Additions of a type
/// that is already present fold into the existing entry, so re-applying
/// the same additions is a no-op. Removals must name a mixin of `base`.
pub fn merge(
    base: &ClassContext,
    amendments: &ContextAmendments,
    catalog: &dyn TypeCatalog,
) -> Result<ClassContext, ConfigurationError> {
    let derived = &amendments.target;
    if catalog.contains(derived) && catalog.contains(base.target()) && !catalog.is_assignable(derived, base.target()) {
        return Err(ConfigurationError::NotDerived { base: base.target().clone(), derived: derived.clone() });
    }

    for removal in &amendments.removals {
        if !base.contains_mixin(removal) {
            return Err(ConfigurationError::RemovalOfAbsentMixin { target: derived.clone(), mixin: removal.clone() });
        }
    }

    let mut mixins = if amendments.clear_mixins {
        Default::default()
    } else {
        base.mixin_map().clone()
    };
    for removal in &amendments.removals {
        mixins.shift_remove(removal);
    }
    for addition in &amendments.additions {
        mixins
            .entry(addition.mixin_type.clone())
            .and_modify(|existing| existing.merge_options(addition))
            .or_insert_with(|| addition.clone());
    }

    let composed_interfaces = base
        .composed_interfaces()
        .iter()
        .chain(amendments.composed_interfaces.iter())
        .cloned()
        .collect();

    let merged = ClassContext::from_parts(derived.clone(), mixins, composed_interfaces);
    merged.check(catalog)?;
    log::debug!(
        "merged context `{}` onto `{}`: {} -> {} mixin(s)",
        derived,
        base.target(),
        base.mixin_count(),
        merged.mixin_count()
    );
    Ok(merged)
}

impl ClassContext {
    /// See [`merge`].
    pub fn merge(&self, amendments: &ContextAmendments, catalog: &dyn TypeCatalog) -> Result<ClassContext, ConfigurationError> {
        merge(self, amendments, catalog)
    }
}
