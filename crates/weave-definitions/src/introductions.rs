use std::collections::BTreeMap;

use weave_catalog::{TypeCatalog, TypeName};

use crate::builder::{participant_is_assignable, record};
use crate::graph::{
    ComposedInterfaceDefinition, IntroducedAttribute, IntroducedInterface, MixinId, Participant, TargetClassDefinition,
};
use crate::problem::ResolutionProblem;

/// Collects what the mixins add to the generated type: interfaces the
/// target does not already implement, attributes, and the implementers of
/// each composed interface.
pub(crate) fn collect(definition: &mut TargetClassDefinition, catalog: &dyn TypeCatalog) {
    introduce_interfaces(definition);
    introduce_attributes(definition);
    compose_interfaces(definition, catalog);
}

fn introduce_interfaces(definition: &mut TargetClassDefinition) {
    let mut introducers: BTreeMap<TypeName, Vec<MixinId>> = BTreeMap::new();
    for mixin in definition.mixins_in_order() {
        for interface in &mixin.interfaces {
            if !definition.target_interfaces.contains(interface) {
                introducers.entry(interface.clone()).or_default().push(mixin.id);
            }
        }
    }

    for (interface, mixins) in introducers {
        let implementer = mixins[0];
        if mixins.len() > 1 {
            let problem = ResolutionProblem::DuplicateIntroduction {
                interface: interface.clone(),
                mixins: mixins.iter().map(|id| definition.mixin(*id).mixin_type.clone()).collect(),
            };
            record(&mut definition.problems, problem);
        }
        definition.introduced_interfaces.push(IntroducedInterface {
            interface,
            implementer,
            visibility: definition.mixin(implementer).context.visibility,
        });
    }
}

fn introduce_attributes(definition: &mut TargetClassDefinition) {
    let mut single_use: BTreeMap<TypeName, Vec<MixinId>> = BTreeMap::new();
    let mut introduced = Vec::new();
    for mixin in definition.mixins_in_order() {
        for attribute in &mixin.attributes {
            if attribute.allow_multiple {
                introduced.push(IntroducedAttribute {
                    attribute_type: attribute.attribute_type.clone(),
                    source: mixin.id,
                    allow_multiple: true,
                });
            } else if definition.attributes.iter().any(|own| own.attribute_type == attribute.attribute_type) {
                log::trace!("`{}` already carries `{}`", definition.target, attribute.attribute_type);
            } else {
                single_use.entry(attribute.attribute_type.clone()).or_default().push(mixin.id);
            }
        }
    }

    for (attribute_type, mixins) in single_use {
        if mixins.len() > 1 {
            let problem = ResolutionProblem::DuplicateAttribute {
                attribute: attribute_type.clone(),
                mixins: mixins.iter().map(|id| definition.mixin(*id).mixin_type.clone()).collect(),
            };
            record(&mut definition.problems, problem);
        }
        introduced.push(IntroducedAttribute { attribute_type, source: mixins[0], allow_multiple: false });
    }
    definition.introduced_attributes = introduced;
}

fn compose_interfaces(definition: &mut TargetClassDefinition, catalog: &dyn TypeCatalog) {
    let participants: Vec<Participant> = std::iter::once(Participant::Target)
        .chain(definition.mixin_order.iter().map(|id| Participant::Mixin(*id)))
        .collect();
    let composed: Vec<ComposedInterfaceDefinition> = definition
        .context
        .composed_interfaces()
        .iter()
        .map(|interface| ComposedInterfaceDefinition {
            interface: interface.clone(),
            implementers: participants
                .iter()
                .copied()
                .filter(|participant| participant_is_assignable(definition, catalog, *participant, interface))
                .collect(),
        })
        .collect();
    definition.composed_interfaces = composed;
}
