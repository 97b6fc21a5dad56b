//! Built-in rule sets, one per node kind.

mod dependency;
mod member;
mod mixin;
mod required_type;
mod target;

use crate::rule::RuleSet;

pub use dependency::dependency_rules;
pub use member::member_rules;
pub use mixin::mixin_rules;
pub use required_type::required_type_rules;
pub use target::target_class_rules;

pub(crate) fn builtin() -> Vec<RuleSet> {
    vec![target_class_rules(), mixin_rules(), member_rules(), dependency_rules(), required_type_rules()]
}
