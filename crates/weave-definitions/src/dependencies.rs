use weave_catalog::{TypeCatalog, TypeName};

use crate::builder::{participant_is_assignable, record};
use crate::graph::{
    DependencyDefinition, DependencyId, DependencyKind, MixinId, Participant, RequiredTypeDefinition,
    TargetClassDefinition,
};
use crate::problem::ResolutionProblem;

/// Nested aggregate interfaces deeper than this are treated as unresolvable.
const MAX_AGGREGATE_DEPTH: usize = 8;

#[derive(Debug, Default)]
struct Resolution {
    implementers: Vec<Participant>,
    is_aggregate: bool,
    aggregated: Vec<TypeName>,
}

/// Resolves every face, next-call and explicit dependency of every mixin,
/// in declaration order, and groups the required types.
pub(crate) fn resolve(definition: &mut TargetClassDefinition, catalog: &dyn TypeCatalog) {
    for index in 0..definition.mixins.len() {
        let requirer = MixinId(index as u32);
        let mixin = &definition.mixins[index];
        let requirements: Vec<(DependencyKind, TypeName)> = mixin
            .face_types
            .iter()
            .map(|ty| (DependencyKind::Face, ty.clone()))
            .chain(mixin.next_call_types.iter().map(|ty| (DependencyKind::NextCall, ty.clone())))
            .chain(mixin.context.depends_on.iter().map(|ty| (DependencyKind::Explicit, ty.clone())))
            .collect();

        for (kind, required_type) in requirements {
            let resolution = resolve_type(definition, catalog, kind, requirer, &required_type, 0);
            let id = DependencyId(definition.dependencies.len() as u32);
            let mut dependency = DependencyDefinition {
                id,
                kind,
                requirer,
                required_type: required_type.clone(),
                implementers: resolution.implementers,
                is_aggregate: resolution.is_aggregate,
                aggregated: resolution.aggregated,
                problems: Vec::new(),
            };
            if dependency.implementers.is_empty() {
                let problem = ResolutionProblem::UnresolvedDependency {
                    kind,
                    requirer: definition.mixins[index].mixin_type.clone(),
                    required_type: required_type.clone(),
                };
                record(&mut dependency.problems, problem);
            }
            definition.dependencies.push(dependency);
            definition.mixins[index].dependencies.push(id);
            register_required_type(definition, catalog, kind, &required_type, requirer, id);
        }
    }
}

/// Candidates in preference order, without aggregate handling.
fn candidates(
    definition: &TargetClassDefinition,
    catalog: &dyn TypeCatalog,
    kind: DependencyKind,
    requirer: MixinId,
    required_type: &TypeName,
) -> Vec<Participant> {
    let assignable = |participant: Participant| participant_is_assignable(definition, catalog, participant, required_type);
    let face = || {
        std::iter::once(Participant::Target)
            .chain(
                definition
                    .mixin_order
                    .iter()
                    .filter(|id| **id != requirer)
                    .map(|id| Participant::Mixin(*id)),
            )
            .filter(|participant| assignable(*participant))
            .collect::<Vec<_>>()
    };

    match kind {
        DependencyKind::Face => face(),
        DependencyKind::NextCall => {
            // Inner mixins first, nearest one leading; the target ends the chain.
            let position = definition.mixin(requirer).position;
            definition.mixin_order[..position]
                .iter()
                .rev()
                .map(|id| Participant::Mixin(*id))
                .chain(std::iter::once(Participant::Target))
                .filter(|participant| assignable(*participant))
                .collect()
        }
        DependencyKind::Explicit => match definition.mixin_by_type(required_type) {
            Some(mixin) if mixin.id != requirer => vec![Participant::Mixin(mixin.id)],
            _ => face(),
        },
    }
}

fn resolve_type(
    definition: &TargetClassDefinition,
    catalog: &dyn TypeCatalog,
    kind: DependencyKind,
    requirer: MixinId,
    required_type: &TypeName,
    depth: usize,
) -> Resolution {
    let found = candidates(definition, catalog, kind, requirer, required_type);
    let aggregate_capable = catalog.is_aggregate_capable(required_type);

    if found.len() > 1 && aggregate_capable {
        return Resolution { implementers: found, is_aggregate: true, aggregated: Vec::new() };
    }
    // A face has no chain position to break ties with; every candidate is
    // kept and validation reports the ambiguity.
    if found.len() > 1 && kind == DependencyKind::Face {
        log::debug!("face `{required_type}` has {} candidate implementers", found.len());
        return Resolution { implementers: found, ..Resolution::default() };
    }
    if let Some(first) = found.first() {
        return Resolution { implementers: vec![*first], ..Resolution::default() };
    }
    if !aggregate_capable || depth >= MAX_AGGREGATE_DEPTH {
        return Resolution::default();
    }

    let bases = catalog.lookup(required_type).map(|info| info.interfaces.clone()).unwrap_or_default();
    let mut implementers = Vec::new();
    for base in &bases {
        let resolution = resolve_type(definition, catalog, kind, requirer, base, depth + 1);
        if resolution.implementers.is_empty() {
            log::debug!("aggregate `{required_type}`: no implementer for `{base}`");
            return Resolution::default();
        }
        for implementer in resolution.implementers {
            if !implementers.contains(&implementer) {
                implementers.push(implementer);
            }
        }
    }
    Resolution { implementers, is_aggregate: true, aggregated: bases }
}

fn register_required_type(
    definition: &mut TargetClassDefinition,
    catalog: &dyn TypeCatalog,
    kind: DependencyKind,
    required_type: &TypeName,
    requirer: MixinId,
    dependency: DependencyId,
) {
    let existing = definition
        .required_types
        .iter()
        .position(|required| required.kind == kind && &required.required_type == required_type);
    match existing {
        Some(position) => {
            let required = &mut definition.required_types[position];
            if !required.requirers.contains(&requirer) {
                required.requirers.push(requirer);
            }
            required.dependencies.push(dependency);
        }
        None => {
            let target_is_assignable = catalog.is_assignable(&definition.target, required_type);
            definition.required_types.push(RequiredTypeDefinition {
                kind,
                required_type: required_type.clone(),
                type_kind: catalog.kind_of(required_type),
                target_is_assignable,
                is_aggregate_capable: catalog.is_aggregate_capable(required_type),
                requirers: vec![requirer],
                dependencies: vec![dependency],
            });
        }
    }
}
