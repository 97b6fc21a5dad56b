use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use weave_catalog::TypeName;

/// Visibility of the interface members a mixin introduces onto the
/// generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntroducedVisibility {
    /// Introduced members are implemented explicitly.
    #[default]
    Private,
    Public,
}

/// One mixin as configured for a target class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MixinContext {
    #[serde(rename = "type")]
    pub mixin_type: TypeName,
    #[serde(default)]
    pub visibility: IntroducedVisibility,
    /// Mixin types or interfaces this mixin needs present in the composition.
    #[serde(default)]
    pub depends_on: BTreeSet<TypeName>,
    /// Mixins this one is applied before (ends up nearer the target).
    #[serde(default)]
    pub precedes: Vec<TypeName>,
    /// Mixins this one is applied after (ends up further from the target).
    #[serde(default)]
    pub follows: Vec<TypeName>,
    /// Names of target members this mixin must not override even if a
    /// signature matches.
    #[serde(default, rename = "suppress")]
    pub suppressed: BTreeSet<String>,
}

impl MixinContext {
    pub fn new(mixin_type: impl Into<TypeName>) -> Self {
        MixinContext {
            mixin_type: mixin_type.into(),
            visibility: IntroducedVisibility::Private,
            depends_on: BTreeSet::new(),
            precedes: Vec::new(),
            follows: Vec::new(),
            suppressed: BTreeSet::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: IntroducedVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn depends_on(mut self, ty: impl Into<TypeName>) -> Self {
        self.depends_on.insert(ty.into());
        self
    }

    pub fn precedes(mut self, mixin: impl Into<TypeName>) -> Self {
        push_unique(&mut self.precedes, mixin.into());
        self
    }

    pub fn follows(mut self, mixin: impl Into<TypeName>) -> Self {
        push_unique(&mut self.follows, mixin.into());
        self
    }

    pub fn suppress(mut self, member_name: impl Into<String>) -> Self {
        self.suppressed.insert(member_name.into());
        self
    }

    /// Folds another configuration of the same mixin type into this one.
    ///
    /// The fold is a union and is idempotent, so configuring a mixin twice
    /// is never an error.
    pub fn merge_options(&mut self, other: &MixinContext) {
        debug_assert_eq!(self.mixin_type, other.mixin_type);
        self.visibility = self.visibility.max(other.visibility);
        self.depends_on.extend(other.depends_on.iter().cloned());
        for mixin in &other.precedes {
            push_unique(&mut self.precedes, mixin.clone());
        }
        for mixin in &other.follows {
            push_unique(&mut self.follows, mixin.clone());
        }
        self.suppressed.extend(other.suppressed.iter().cloned());
    }

    pub fn is_suppressed(&self, member_name: &str) -> bool {
        self.suppressed.contains(member_name)
    }
}

fn push_unique(list: &mut Vec<TypeName>, ty: TypeName) {
    if !list.contains(&ty) {
        list.push(ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_options_is_idempotent() {
        let mut a = MixinContext::new("M").precedes("N").suppress("Save");
        let b = MixinContext::new("M").precedes("O").depends_on("App.IAudit").with_visibility(IntroducedVisibility::Public);

        a.merge_options(&b);
        let once = a.clone();
        a.merge_options(&b);

        assert_eq!(a, once);
        assert_eq!(a.precedes, vec![TypeName::from("N"), TypeName::from("O")]);
        assert_eq!(a.visibility, IntroducedVisibility::Public);
        assert!(a.is_suppressed("Save"));
    }
}
