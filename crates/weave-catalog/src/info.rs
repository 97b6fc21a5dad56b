use serde::{Deserialize, Serialize};

use crate::names::{MemberKind, Signature, TypeName, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
}

/// The generic composition base a mixin type derives from.
///
/// A mixin that declares this shape can be subclassed by the code emitter
/// (which is what allows the target to override its members), and names
/// the interfaces it expects from the target (`face`) and from the rest of
/// the override chain (`next_call`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MixinBase {
    #[serde(default)]
    pub face: Vec<TypeName>,
    #[serde(default)]
    pub next_call: Vec<TypeName>,
}

/// An attribute applied to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeInfo {
    #[serde(rename = "type")]
    pub attribute_type: TypeName,
    /// Combinable attributes may appear more than once on the composed type.
    #[serde(default)]
    pub allow_multiple: bool,
}

/// Declares that a member overrides a member of another participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideMarker {
    /// A mixin member overriding the target member with the same signature.
    Target,
    /// A target member overriding a mixin member with the same signature,
    /// optionally restricted to one mixin type.
    Mixin {
        #[serde(default)]
        mixin: Option<TypeName>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberInfo {
    #[serde(flatten)]
    pub signature: Signature,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default, rename = "override")]
    pub override_marker: Option<OverrideMarker>,
}

impl MemberInfo {
    pub fn new(signature: Signature) -> Self {
        MemberInfo {
            signature,
            visibility: Visibility::Public,
            is_abstract: false,
            is_virtual: false,
            is_final: false,
            override_marker: None,
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        MemberInfo::new(Signature::method(name))
    }

    pub fn property(name: impl Into<String>) -> Self {
        MemberInfo::new(Signature::property(name))
    }

    pub fn event(name: impl Into<String>) -> Self {
        MemberInfo::new(Signature::event(name))
    }

    pub fn with_parameters<I, T>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.signature = self.signature.with_parameters(parameters);
        self
    }

    pub fn returning(mut self, ty: impl Into<TypeName>) -> Self {
        self.signature = self.signature.returning(ty);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn as_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Abstract members are implicitly virtual.
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self.is_virtual = true;
        self
    }

    pub fn as_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn overriding_target(mut self) -> Self {
        self.override_marker = Some(OverrideMarker::Target);
        self
    }

    pub fn overriding_mixin(mut self, mixin: Option<&str>) -> Self {
        self.override_marker = Some(OverrideMarker::Mixin { mixin: mixin.map(TypeName::from) });
        self
    }

    pub fn kind(&self) -> MemberKind {
        self.signature.kind
    }

    /// Whether another member may override this one.
    pub fn is_overridable(&self) -> bool {
        (self.is_virtual || self.is_abstract) && !self.is_final
    }
}

/// Everything the engine needs to know about one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: TypeName,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub base: Option<TypeName>,
    #[serde(default)]
    pub interfaces: Vec<TypeName>,
    #[serde(default, rename = "sealed")]
    pub is_sealed: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "constructor")]
    pub constructor_visibility: Visibility,
    #[serde(default)]
    pub mixin_base: Option<MixinBase>,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
    #[serde(default, rename = "member")]
    pub members: Vec<MemberInfo>,
}

impl TypeInfo {
    pub fn class(name: impl Into<TypeName>) -> Self {
        TypeInfo {
            name: name.into(),
            kind: TypeKind::Class,
            base: None,
            interfaces: Vec::new(),
            is_sealed: false,
            is_abstract: false,
            constructor_visibility: Visibility::Public,
            mixin_base: None,
            attributes: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<TypeName>) -> Self {
        TypeInfo { kind: TypeKind::Interface, ..TypeInfo::class(name) }
    }

    /// A class deriving from the generic mixin base with the given face and
    /// next-call requirements.
    pub fn mixin<F, N>(name: impl Into<TypeName>, face: F, next_call: N) -> Self
    where
        F: IntoIterator,
        F::Item: Into<TypeName>,
        N: IntoIterator,
        N::Item: Into<TypeName>,
    {
        TypeInfo {
            mixin_base: Some(MixinBase {
                face: face.into_iter().map(Into::into).collect(),
                next_call: next_call.into_iter().map(Into::into).collect(),
            }),
            ..TypeInfo::class(name)
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeName>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_attribute(mut self, attribute_type: impl Into<TypeName>, allow_multiple: bool) -> Self {
        self.attributes.push(AttributeInfo { attribute_type: attribute_type.into(), allow_multiple });
        self
    }

    pub fn with_constructor(mut self, visibility: Visibility) -> Self {
        self.constructor_visibility = visibility;
        self
    }

    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn declared_member(&self, signature: &Signature) -> Option<&MemberInfo> {
        self.members.iter().find(|m| &m.signature == signature)
    }
}
