use weave_catalog::TypeKind;
use weave_definitions::{DependencyKind, MixinDefinition, Participant, TargetClassDefinition};

use crate::rule::{Rule, RuleSet};

pub fn mixin_rules() -> RuleSet {
    RuleSet::new("mixin")
        .with_rule(Rule::mixin("mixin.resolution", |_, mixin, log| {
            for problem in &mixin.problems {
                log.error(problem.to_string());
            }
        }))
        .with_rule(Rule::mixin("mixin.is-class", |_, mixin, log| {
            if mixin.kind == Some(TypeKind::Interface) {
                log.error("an interface cannot be used as a mixin");
            }
        }))
        .with_rule(Rule::mixin("mixin.not-sealed", |definition, mixin, log| {
            if mixin.is_sealed && definition.requires_concrete_type(mixin.id) {
                log.error("a sealed mixin cannot take part in overriding; its generated subclass would derive from it");
            }
        }))
        .with_rule(Rule::mixin("mixin.constructible", |definition, mixin, log| {
            let needed = definition.requires_concrete_type(mixin.id) || used_as_value(definition, mixin);
            if needed && !mixin.constructor_visibility.is_subclass_accessible() {
                log.error(format!(
                    "mixin must expose a public or protected constructor, found {}",
                    mixin.constructor_visibility
                ));
            }
        }))
        .with_rule(Rule::mixin("mixin.ordering-references", |definition, mixin, log| {
            let related = mixin.context.precedes.iter().chain(mixin.context.follows.iter());
            for other in related {
                if !definition.context.contains_mixin(other) {
                    log.warn(format!("ordering refers to `{other}`, which is not configured for this target"));
                }
            }
        }))
}

/// Another mixin explicitly depends on this mixin's class, not on an
/// interface it implements.
fn used_as_value(definition: &TargetClassDefinition, mixin: &MixinDefinition) -> bool {
    definition.dependencies.iter().any(|dependency| {
        dependency.kind == DependencyKind::Explicit
            && dependency.required_type == mixin.mixin_type
            && dependency.implementers == [Participant::Mixin(mixin.id)]
    })
}
