//! Stable, reflection-independent names for types and members.

use std::fmt;
use serde::{Deserialize, Serialize};

/// The fully qualified name of a type known to a [`TypeCatalog`](crate::TypeCatalog).
///
/// Type identity throughout the engine is by name, so two catalogs that
/// describe the same type produce interchangeable definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        TypeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last `.`-separated segment (`App.Orders.Order` -> `Order`).
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName(name)
    }
}

/// What sort of member a [`Signature`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    #[default]
    Method,
    Property,
    Event,
}

/// The shape of a member, abstracted from any one reflection mechanism.
///
/// Two members *match* for override purposes when their name, kind and
/// parameter shapes are identical; see [`Signature::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    #[serde(default)]
    pub kind: MemberKind,
    #[serde(default)]
    pub parameters: Vec<TypeName>,
    #[serde(default, rename = "returns")]
    pub return_type: Option<TypeName>,
}

impl Signature {
    pub fn method(name: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            kind: MemberKind::Method,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Signature { kind: MemberKind::Property, ..Signature::method(name) }
    }

    pub fn event(name: impl Into<String>) -> Self {
        Signature { kind: MemberKind::Event, ..Signature::method(name) }
    }

    pub fn with_parameters<I, T>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn returning(mut self, ty: impl Into<TypeName>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Exact override match: name, member kind and parameter shapes.
    /// Return types are deliberately not part of the match.
    pub fn matches(&self, other: &Signature) -> bool {
        self.name == other.name && self.kind == other.kind && self.parameters == other.parameters
    }

    /// An identifier-safe rendering, unique per name + parameter list.
    /// Used to derive names of generated wrapper and interface methods.
    ///
    /// Every `_` in the output starts an escape: `__` is a literal
    /// underscore, `_d` a dot, `_p` a parameter separator and `_u<hex>_`
    /// any other character, so distinct signatures never collide.
    pub fn mangled(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        mangle_into(&mut out, &self.name);
        for parameter in &self.parameters {
            out.push_str("_p");
            mangle_into(&mut out, parameter.as_str());
        }
        out
    }
}

fn mangle_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '_' => out.push_str("__"),
            '.' => out.push_str("_d"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => out.push_str(&format!("_u{:x}_", c as u32)),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.parameters.iter().map(TypeName::as_str).collect::<Vec<_>>().join(", ");
        match self.kind {
            MemberKind::Method => write!(f, "{}({})", self.name, params),
            MemberKind::Property | MemberKind::Event if params.is_empty() => f.write_str(&self.name),
            MemberKind::Property | MemberKind::Event => write!(f, "{}[{}]", self.name, params),
        }
    }
}

/// A member named by its declaring type and signature.
///
/// This is the persistent form of a member reference: it survives
/// process restarts and is what identifiers and exported metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberRef {
    pub declaring_type: TypeName,
    pub signature: Signature,
}

impl MemberRef {
    pub fn new(declaring_type: impl Into<TypeName>, signature: Signature) -> Self {
        MemberRef { declaring_type: declaring_type.into(), signature }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.signature)
    }
}

/// Accessibility of a member or constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    Internal,
    Protected,
    ProtectedInternal,
    #[default]
    Public,
}

impl Visibility {
    /// Whether a generated subclass can see (and therefore wrap or call) the member.
    pub fn is_subclass_accessible(self) -> bool {
        matches!(self, Visibility::Protected | Visibility::ProtectedInternal | Visibility::Public)
    }

    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::ProtectedInternal => "protected internal",
            Visibility::Public => "public",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_match_ignoring_return_type() {
        let a = Signature::method("Save").with_parameters(["System.Int32"]).returning("System.Boolean");
        let b = Signature::method("Save").with_parameters(["System.Int32"]);
        assert!(a.matches(&b));
        assert_ne!(a, b);

        let property = Signature::property("Save");
        assert!(!property.matches(&b.clone().with_parameters(Vec::<TypeName>::new())));
    }

    #[test]
    fn display_and_mangling() {
        let sig = Signature::method("Load").with_parameters(["System.Int32", "App.Key"]);
        assert_eq!(sig.to_string(), "Load(System.Int32, App.Key)");
        assert_eq!(sig.mangled(), "Load_pSystem_dInt32_pApp_dKey");
        assert_eq!(Signature::method("Save").mangled(), "Save");
        assert_eq!(Signature::property("Name").to_string(), "Name");
        assert_eq!(MemberRef::new("App.Order", Signature::method("Save")).to_string(), "App.Order.Save()");
        assert_eq!(TypeName::new("App.Orders.Order").short_name(), "Order");
    }

    #[test]
    fn mangling_keeps_overloads_apart() {
        let single = Signature::method("Load").with_parameters(["App.Key"]);
        let split = Signature::method("Load").with_parameters(["App", "Key"]);
        let underscored = Signature::method("Load").with_parameters(["App_Key"]);
        let generic = Signature::method("Load").with_parameters(["List<App.Key>"]);
        assert_eq!(single.mangled(), "Load_pApp_dKey");
        assert_eq!(split.mangled(), "Load_pApp_pKey");
        assert_eq!(underscored.mangled(), "Load_pApp__Key");
        assert_eq!(generic.mangled(), "Load_pList_u3c_App_dKey_u3e_");
        assert_eq!(Signature::method("Load_pApp").mangled(), "Load__pApp");
    }

    #[test]
    fn visibility_accessibility() {
        assert!(!Visibility::Private.is_subclass_accessible());
        assert!(!Visibility::Internal.is_subclass_accessible());
        assert!(Visibility::Protected.is_subclass_accessible());
        assert!(Visibility::Public.is_public());
    }
}
