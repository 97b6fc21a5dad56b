use std::fmt;

use weave_definitions::{
    DependencyDefinition, MemberDefinition, MixinDefinition, RequiredTypeDefinition, TargetClassDefinition,
};

use crate::findings::ValidationLog;

/// The kind of definition node a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    TargetClass,
    Mixin,
    Member,
    Dependency,
    RequiredType,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::TargetClass => "target class",
            NodeKind::Mixin => "mixin",
            NodeKind::Member => "member",
            NodeKind::Dependency => "dependency",
            NodeKind::RequiredType => "required type",
        };
        f.write_str(name)
    }
}

pub type TargetClassCheck = Box<dyn Fn(&TargetClassDefinition, &mut ValidationLog) + Send + Sync>;
pub type MixinCheck = Box<dyn Fn(&TargetClassDefinition, &MixinDefinition, &mut ValidationLog) + Send + Sync>;
pub type MemberCheck = Box<dyn Fn(&TargetClassDefinition, &MemberDefinition, &mut ValidationLog) + Send + Sync>;
pub type DependencyCheck =
    Box<dyn Fn(&TargetClassDefinition, &DependencyDefinition, &mut ValidationLog) + Send + Sync>;
pub type RequiredTypeCheck =
    Box<dyn Fn(&TargetClassDefinition, &RequiredTypeDefinition, &mut ValidationLog) + Send + Sync>;

/// A rule function, tagged with the node kind it inspects.
pub enum RuleCheck {
    TargetClass(TargetClassCheck),
    Mixin(MixinCheck),
    Member(MemberCheck),
    Dependency(DependencyCheck),
    RequiredType(RequiredTypeCheck),
}

/// A named, read-only check over one kind of definition node.
///
/// Rules only read the graph and append findings to the log they are
/// handed.
pub struct Rule {
    name: String,
    check: RuleCheck,
}

impl Rule {
    pub fn target_class<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TargetClassDefinition, &mut ValidationLog) + Send + Sync + 'static,
    {
        Rule { name: name.into(), check: RuleCheck::TargetClass(Box::new(check)) }
    }

    pub fn mixin<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TargetClassDefinition, &MixinDefinition, &mut ValidationLog) + Send + Sync + 'static,
    {
        Rule { name: name.into(), check: RuleCheck::Mixin(Box::new(check)) }
    }

    pub fn member<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TargetClassDefinition, &MemberDefinition, &mut ValidationLog) + Send + Sync + 'static,
    {
        Rule { name: name.into(), check: RuleCheck::Member(Box::new(check)) }
    }

    pub fn dependency<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TargetClassDefinition, &DependencyDefinition, &mut ValidationLog) + Send + Sync + 'static,
    {
        Rule { name: name.into(), check: RuleCheck::Dependency(Box::new(check)) }
    }

    pub fn required_type<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TargetClassDefinition, &RequiredTypeDefinition, &mut ValidationLog) + Send + Sync + 'static,
    {
        Rule { name: name.into(), check: RuleCheck::RequiredType(Box::new(check)) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_kind(&self) -> NodeKind {
        match self.check {
            RuleCheck::TargetClass(_) => NodeKind::TargetClass,
            RuleCheck::Mixin(_) => NodeKind::Mixin,
            RuleCheck::Member(_) => NodeKind::Member,
            RuleCheck::Dependency(_) => NodeKind::Dependency,
            RuleCheck::RequiredType(_) => NodeKind::RequiredType,
        }
    }

    pub fn check(&self) -> &RuleCheck {
        &self.check
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).field("node_kind", &self.node_kind()).finish()
    }
}

/// A named bundle of rules, installed into a [`Validator`](crate::Validator) as a unit.
#[derive(Debug)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        RuleSet { name: name.into(), rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules of this set that apply to `kind`.
    pub fn rules_for(&self, kind: NodeKind) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(move |rule| rule.node_kind() == kind)
    }
}
