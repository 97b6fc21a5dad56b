//! Mixin application order.
//!
//! Ordering constraints form a graph over the mixins of one context:
//! `precedes`/`follows` declarations, explicit `depends_on` on another
//! mixin, and next-call dependencies on an interface another mixin
//! implements. A topological sort produces the application order; ties
//! go to the mixin declared first. Mixins caught in a cycle keep their
//! declaration order and the cycle is reported.

use std::collections::BTreeSet;

use weave_catalog::{TypeCatalog, TypeName};

use crate::builder::record;
use crate::graph::{MixinId, TargetClassDefinition};
use crate::problem::ResolutionProblem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MixinOrdering {
    pub order: Vec<MixinId>,
    /// Strongly connected groups of more than one mixin, each in
    /// declaration order.
    pub cycles: Vec<Vec<MixinId>>,
}

pub(crate) fn order_mixins(definition: &TargetClassDefinition, catalog: &dyn TypeCatalog) -> MixinOrdering {
    let edges = ordering_edges(definition, catalog);
    let count = edges.len();

    let mut in_degree = vec![0usize; count];
    for successors in &edges {
        for &successor in successors {
            in_degree[successor] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..count).filter(|&index| in_degree[index] == 0).collect();
    let mut order = Vec::with_capacity(count);
    while let Some(index) = ready.pop_first() {
        order.push(index);
        for &successor in &edges[index] {
            in_degree[successor] -= 1;
            if in_degree[successor] == 0 {
                ready.insert(successor);
            }
        }
    }

    let mut cycles = Vec::new();
    if order.len() < count {
        let placed: BTreeSet<usize> = order.iter().copied().collect();
        let remaining: Vec<usize> = (0..count).filter(|index| !placed.contains(index)).collect();
        cycles = strongly_connected(&edges, &remaining)
            .into_iter()
            .filter(|component| component.len() > 1)
            .collect();
        order.extend(remaining);
    }

    MixinOrdering {
        order: order.into_iter().map(|index| MixinId(index as u32)).collect(),
        cycles: cycles
            .into_iter()
            .map(|component| component.into_iter().map(|index| MixinId(index as u32)).collect())
            .collect(),
    }
}

pub(crate) fn apply(definition: &mut TargetClassDefinition, ordering: MixinOrdering) {
    for (position, id) in ordering.order.iter().enumerate() {
        definition.mixins[id.index()].position = position;
    }
    for cycle in &ordering.cycles {
        let mixins: Vec<TypeName> = cycle.iter().map(|id| definition.mixin(*id).mixin_type.clone()).collect();
        record(&mut definition.problems, ResolutionProblem::OrderingCycle { mixins });
    }
    definition.mixin_order = ordering.order;
    definition.ordering_cycles = ordering.cycles;
}

/// `edges[a]` holds every mixin that must be applied after `a`.
fn ordering_edges(definition: &TargetClassDefinition, catalog: &dyn TypeCatalog) -> Vec<BTreeSet<usize>> {
    let context = &definition.context;
    let mut edges = vec![BTreeSet::new(); definition.mixins.len()];
    let mut add = |before: usize, after: usize| {
        if before != after {
            edges[before].insert(after);
        }
    };

    for (index, mixin) in definition.mixins.iter().enumerate() {
        for later in &mixin.context.precedes {
            match context.declaration_index(later) {
                Some(other) => add(index, other),
                None => log::debug!("`{}` precedes `{}`, which is not configured", mixin.mixin_type, later),
            }
        }
        for earlier in &mixin.context.follows {
            match context.declaration_index(earlier) {
                Some(other) => add(other, index),
                None => log::debug!("`{}` follows `{}`, which is not configured", mixin.mixin_type, earlier),
            }
        }
        for required in &mixin.context.depends_on {
            if let Some(other) = context.declaration_index(required) {
                add(other, index);
            }
        }
        for next_call in &mixin.next_call_types {
            for (other, candidate) in definition.mixins.iter().enumerate() {
                if other != index && catalog.is_assignable(&candidate.mixin_type, next_call) {
                    add(other, index);
                }
            }
        }
    }
    edges
}

/// Tarjan's algorithm restricted to `nodes`. Components come out sorted by
/// their smallest member, members sorted ascending.
fn strongly_connected(edges: &[BTreeSet<usize>], nodes: &[usize]) -> Vec<Vec<usize>> {
    struct State<'a> {
        edges: &'a [BTreeSet<usize>],
        included: BTreeSet<usize>,
        next_index: usize,
        index: Vec<Option<usize>>,
        low_link: Vec<usize>,
        on_stack: Vec<bool>,
        stack: Vec<usize>,
        components: Vec<Vec<usize>>,
    }

    fn visit(state: &mut State<'_>, node: usize) {
        state.index[node] = Some(state.next_index);
        state.low_link[node] = state.next_index;
        state.next_index += 1;
        state.stack.push(node);
        state.on_stack[node] = true;

        for &successor in &state.edges[node] {
            if !state.included.contains(&successor) {
                continue;
            }
            match state.index[successor] {
                None => {
                    visit(state, successor);
                    state.low_link[node] = state.low_link[node].min(state.low_link[successor]);
                }
                Some(successor_index) if state.on_stack[successor] => {
                    state.low_link[node] = state.low_link[node].min(successor_index);
                }
                Some(_) => {}
            }
        }

        if Some(state.low_link[node]) == state.index[node] {
            let mut component = Vec::new();
            while let Some(member) = state.stack.pop() {
                state.on_stack[member] = false;
                component.push(member);
                if member == node {
                    break;
                }
            }
            component.sort_unstable();
            state.components.push(component);
        }
    }

    let count = edges.len();
    let mut state = State {
        edges,
        included: nodes.iter().copied().collect(),
        next_index: 0,
        index: vec![None; count],
        low_link: vec![0; count],
        on_stack: vec![false; count],
        stack: Vec::new(),
        components: Vec::new(),
    };
    for &node in nodes {
        if state.index[node].is_none() {
            visit(&mut state, node);
        }
    }
    let mut components = state.components;
    components.sort_by_key(|component| component[0]);
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(count: usize, pairs: &[(usize, usize)]) -> Vec<BTreeSet<usize>> {
        let mut edges = vec![BTreeSet::new(); count];
        for &(from, to) in pairs {
            edges[from].insert(to);
        }
        edges
    }

    #[test]
    fn finds_cycles_and_skips_singletons() {
        let graph = edges(5, &[(0, 1), (1, 0), (2, 3), (3, 4), (4, 2)]);
        let components = strongly_connected(&graph, &[0, 1, 2, 3, 4]);
        assert_eq!(components, vec![vec![0, 1], vec![2, 3, 4]]);

        let acyclic = edges(3, &[(0, 1), (1, 2)]);
        let components = strongly_connected(&acyclic, &[0, 1, 2]);
        assert!(components.iter().all(|component| component.len() == 1));
    }

    #[test]
    fn ignores_nodes_outside_the_subset() {
        let graph = edges(3, &[(0, 1), (1, 2), (2, 0)]);
        let components = strongly_connected(&graph, &[0, 1]);
        assert_eq!(components, vec![vec![0], vec![1]]);
    }
}
