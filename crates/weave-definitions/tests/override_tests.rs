use expect_test::expect;
use weave_catalog::{InMemoryCatalog, MemberInfo, TypeInfo, Visibility};
use weave_context::MixinContext;
use weave_definitions::{MixinId, Participant, ResolutionProblem};

use crate::common::*;

#[test]
fn mixin_member_overrides_inherited_target_member() {
    let catalog = catalog(vec![
        TypeInfo::class("App.Base").with_member(MemberInfo::method("Save").as_virtual()),
        TypeInfo::class(TARGET).with_base("App.Base"),
        mixin("App.M1").with_member(MemberInfo::method("Save").overriding_target()),
    ]);
    let definition = build(&catalog, &context(&catalog, vec![MixinContext::new("App.M1")]));

    let save = definition.member(target_member(&definition, "Save"));
    assert_eq!(save.declaring_type, name("App.Base"));
    assert_eq!(save.overridden_by.len(), 1);
    assert_eq!(chain(&definition, "Save"), vec!["App.M1.Save()", "App.Target.Save()"]);
    assert!(definition.requires_concrete_type(MixinId(0)));
}

#[test]
fn target_member_overrides_mixin_member() {
    let catalog = catalog(vec![
        TypeInfo::class(TARGET).with_member(
            MemberInfo::method("Audit")
                .with_visibility(Visibility::Protected)
                .overriding_mixin(Some("App.M1")),
        ),
        mixin("App.M1").with_member(MemberInfo::method("Audit").as_abstract()),
        mixin("App.M2").with_member(MemberInfo::method("Audit").as_virtual()),
    ]);
    let definition = build(
        &catalog,
        &context(&catalog, vec![MixinContext::new("App.M1"), MixinContext::new("App.M2")]),
    );

    let audit = definition.member(target_member(&definition, "Audit"));
    let overridden = definition.find_member(Participant::Mixin(MixinId(0)), "Audit").unwrap();
    assert_eq!(audit.overrides, vec![overridden.id]);
    assert_eq!(audit.base, Some(overridden.id));
    assert_eq!(overridden.overridden_by, vec![audit.id]);
    assert!(definition.requires_concrete_type(MixinId(0)));
    assert!(!definition.requires_concrete_type(MixinId(1)));
    assert!(!definition.has_problems());
}

#[test]
fn unnamed_mixin_override_is_ambiguous_across_mixins() {
    let catalog = catalog(vec![
        TypeInfo::class(TARGET).with_member(MemberInfo::method("Audit").overriding_mixin(None)),
        mixin("App.M1").with_member(MemberInfo::method("Audit").as_virtual()),
        mixin("App.M2").with_member(MemberInfo::method("Audit").as_virtual()),
    ]);
    let definition = build(
        &catalog,
        &context(&catalog, vec![MixinContext::new("App.M1"), MixinContext::new("App.M2")]),
    );

    let audit = definition.member(target_member(&definition, "Audit"));
    assert!(audit.overrides.is_empty());
    expect![[r#"
        [
            "Ambiguous override: `App.Target.Audit()` matches `App.M1.Audit()`, `App.M2.Audit()`",
        ]
    "#]]
    .assert_debug_eq(&problems(&definition));
}

#[test]
fn override_needs_matching_parameters() {
    let catalog = catalog(vec![
        TypeInfo::class(TARGET).with_member(MemberInfo::method("Load").with_parameters(["System.String"]).as_virtual()),
        mixin("App.M1").with_member(MemberInfo::method("Load").with_parameters(["System.Int32"]).overriding_target()),
    ]);
    let definition = build(&catalog, &context(&catalog, vec![MixinContext::new("App.M1")]));

    let load = definition.find_member(Participant::Mixin(MixinId(0)), "Load").unwrap();
    assert!(matches!(&load.problems[..], [ResolutionProblem::OverrideTargetNotFound { .. }]));
    expect![[r#"
        [
            "Override target not found: `App.M1.Load(System.Int32)` overrides nothing on target `App.Target`",
        ]
    "#]]
    .assert_debug_eq(&problems(&definition));
}

#[test]
fn suppressed_members_are_not_linked() {
    let catalog = catalog(overriding_pair());
    let context = context(
        &catalog,
        vec![MixinContext::new("App.M1").suppress("Foo"), MixinContext::new("App.M2")],
    );
    let definition = build(&catalog, &context);

    assert_eq!(chain(&definition, "Foo"), vec!["App.M2.Foo()", "App.Target.Foo()"]);
    assert!(!definition.requires_concrete_type(MixinId(0)));
    assert!(!definition.has_problems());
}

#[test]
fn unknown_mixin_type_is_recorded() {
    let full = catalog(overriding_pair());
    let context = context(&full, vec![MixinContext::new("App.M1"), MixinContext::new("App.M2")]);

    let mut partial: InMemoryCatalog = full.clone();
    partial.remove_type(&name("App.M2"));
    let definition = build(&partial, &context);

    assert_eq!(definition.mixins[1].kind, None);
    assert!(definition.mixins[1].members.is_empty());
    assert_eq!(
        definition.mixins[1].problems,
        vec![ResolutionProblem::UnknownType { name: name("App.M2") }]
    );
    assert_eq!(chain(&definition, "Foo"), vec!["App.M1.Foo()", "App.Target.Foo()"]);
}
