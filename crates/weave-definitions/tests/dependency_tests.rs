use expect_test::expect;
use weave_catalog::{MemberInfo, TypeInfo, TypeKind};
use weave_context::MixinContext;
use weave_definitions::{DependencyKind, MixinId, Participant, ResolutionProblem};

use crate::common::*;

#[test]
fn face_on_the_target_class() {
    let catalog = catalog(vec![TypeInfo::class(TARGET), mixin("App.M1"), mixin("App.M2")]);
    let definition = build(
        &catalog,
        &context(&catalog, vec![MixinContext::new("App.M1"), MixinContext::new("App.M2")]),
    );

    assert_eq!(definition.dependencies.len(), 2);
    for dependency in &definition.dependencies {
        assert_eq!(dependency.kind, DependencyKind::Face);
        assert_eq!(dependency.implementers, vec![Participant::Target]);
        assert!(!dependency.is_aggregate);
    }

    let [required] = &definition.required_types[..] else {
        panic!("expected one required type, got {:?}", definition.required_types);
    };
    assert_eq!(required.required_type, name(TARGET));
    assert_eq!(required.type_kind, Some(TypeKind::Class));
    assert!(required.target_is_assignable);
    assert_eq!(required.requirers, vec![MixinId(0), MixinId(1)]);
}

#[test]
fn next_call_prefers_the_nearest_inner_mixin() {
    let catalog = catalog(vec![
        TypeInfo::interface("App.ISave").with_member(MemberInfo::method("Save")),
        TypeInfo::class(TARGET).with_interface("App.ISave"),
        mixin("App.Inner").with_interface("App.ISave"),
        mixin("App.Middle").with_interface("App.ISave"),
        TypeInfo::mixin("App.Outer", [TARGET], ["App.ISave"]),
    ]);
    let definition = build(
        &catalog,
        &context(
            &catalog,
            vec![MixinContext::new("App.Outer"), MixinContext::new("App.Inner"), MixinContext::new("App.Middle")],
        ),
    );

    assert_eq!(order(&definition), vec!["App.Inner", "App.Middle", "App.Outer"]);
    let outer = definition.mixin_by_type(&name("App.Outer")).unwrap();
    let next_call = outer
        .dependencies
        .iter()
        .map(|id| definition.dependency(*id))
        .find(|dependency| dependency.kind == DependencyKind::NextCall)
        .unwrap();
    assert_eq!(next_call.implementers, vec![Participant::Mixin(MixinId(2))]);
}

#[test]
fn next_call_falls_back_to_the_target() {
    let catalog = catalog(vec![
        TypeInfo::interface("App.ISave").with_member(MemberInfo::method("Save")),
        TypeInfo::class(TARGET).with_interface("App.ISave"),
        TypeInfo::mixin("App.M1", [TARGET], ["App.ISave"]),
    ]);
    let definition = build(&catalog, &context(&catalog, vec![MixinContext::new("App.M1")]));

    let next_call = &definition.dependencies[1];
    assert_eq!(next_call.kind, DependencyKind::NextCall);
    assert_eq!(next_call.implementers, vec![Participant::Target]);
}

#[test]
fn unresolved_dependency_is_recorded() {
    let catalog = catalog(vec![
        TypeInfo::interface("App.ISave").with_member(MemberInfo::method("Save")),
        TypeInfo::class(TARGET),
        TypeInfo::mixin("App.M1", [TARGET], ["App.ISave"]),
    ]);
    let definition = build(&catalog, &context(&catalog, vec![MixinContext::new("App.M1")]));

    let next_call = &definition.dependencies[1];
    assert!(!next_call.is_resolved());
    assert!(matches!(&next_call.problems[..], [ResolutionProblem::UnresolvedDependency { .. }]));
    expect![[r#"
        [
            "Unresolved dependency: next-call dependency of `App.M1` on `App.ISave` has no implementer",
        ]
    "#]]
    .assert_debug_eq(&problems(&definition));
}

#[test]
fn aggregate_interface_is_satisfied_jointly() {
    let catalog = catalog(vec![
        TypeInfo::interface("App.IRead").with_member(MemberInfo::method("Read")),
        TypeInfo::interface("App.IWrite").with_member(MemberInfo::method("Write")),
        TypeInfo::interface("App.IStore").with_interface("App.IRead").with_interface("App.IWrite"),
        TypeInfo::class(TARGET).with_interface("App.IRead"),
        mixin("App.Writer").with_interface("App.IWrite"),
        TypeInfo::mixin("App.Cache", ["App.IStore"], Vec::<&str>::new()),
    ]);
    let definition = build(
        &catalog,
        &context(&catalog, vec![MixinContext::new("App.Writer"), MixinContext::new("App.Cache")]),
    );

    let cache = definition.mixin_by_type(&name("App.Cache")).unwrap();
    let face = definition.dependency(cache.dependencies[0]);
    assert!(face.is_aggregate);
    assert_eq!(face.implementers, vec![Participant::Target, Participant::Mixin(MixinId(0))]);
    assert_eq!(face.aggregated, vec![name("App.IRead"), name("App.IWrite")]);
    assert!(!definition.has_problems());
}

#[test]
fn aggregate_with_a_missing_part_is_unresolved() {
    let catalog = catalog(vec![
        TypeInfo::interface("App.IRead").with_member(MemberInfo::method("Read")),
        TypeInfo::interface("App.IWrite").with_member(MemberInfo::method("Write")),
        TypeInfo::interface("App.IStore").with_interface("App.IRead").with_interface("App.IWrite"),
        TypeInfo::class(TARGET).with_interface("App.IRead"),
        TypeInfo::mixin("App.Cache", ["App.IStore"], Vec::<&str>::new()),
    ]);
    let definition = build(&catalog, &context(&catalog, vec![MixinContext::new("App.Cache")]));

    let face = &definition.dependencies[0];
    assert!(face.implementers.is_empty());
    assert_eq!(face.problems.len(), 1);
}

#[test]
fn explicit_dependency_on_a_mixin_orders_it_first() {
    let catalog = catalog(vec![TypeInfo::class(TARGET), mixin("App.Audit"), mixin("App.Log")]);
    let definition = build(
        &catalog,
        &context(
            &catalog,
            vec![MixinContext::new("App.Audit").depends_on("App.Log"), MixinContext::new("App.Log")],
        ),
    );

    assert_eq!(order(&definition), vec!["App.Log", "App.Audit"]);
    let explicit = definition
        .dependencies
        .iter()
        .find(|dependency| dependency.kind == DependencyKind::Explicit)
        .unwrap();
    assert_eq!(explicit.requirer, MixinId(0));
    assert_eq!(explicit.implementers, vec![Participant::Mixin(MixinId(1))]);
}

#[test]
fn ambiguous_face_keeps_every_candidate() {
    let catalog = catalog(vec![
        TypeInfo::interface("App.IFoo").with_member(MemberInfo::method("Foo")),
        TypeInfo::class(TARGET).with_interface("App.IFoo"),
        mixin("App.A").with_interface("App.IFoo"),
        TypeInfo::mixin("App.C", ["App.IFoo"], Vec::<&str>::new()),
    ]);
    let definition = build(
        &catalog,
        &context(&catalog, vec![MixinContext::new("App.A"), MixinContext::new("App.C")]),
    );

    let c = definition.mixin_by_type(&name("App.C")).unwrap();
    let face = definition.dependency(c.dependencies[0]);
    assert_eq!(face.implementers, vec![Participant::Target, Participant::Mixin(MixinId(0))]);
    assert!(!face.is_aggregate);
    assert!(face.problems.is_empty());
}
