//! Definition graph construction for the Weave composition engine.
//!
//! [`DefinitionBuilder`] turns a frozen [`ClassContext`](weave_context::ClassContext)
//! into a [`TargetClassDefinition`]: every member of the target and its
//! mixins, override links, the mixin application order and next-call
//! chains, resolved dependencies, and what the mixins introduce. Problems
//! are collected on the graph instead of aborting the build.

mod builder;
mod chains;
mod dependencies;
mod graph;
mod introductions;
mod ordering;
mod problem;

pub use builder::DefinitionBuilder;
pub use graph::{
    ComposedInterfaceDefinition, DependencyDefinition, DependencyId, DependencyKind, IntroducedAttribute,
    IntroducedInterface, MemberDefinition, MemberId, MixinDefinition, MixinId, Participant, RequiredTypeDefinition,
    TargetClassDefinition,
};
pub use problem::ResolutionProblem;
