//! Type catalog for the Weave mixin composition engine.
//!
//! The engine never inspects real, loaded types. Everything it needs to
//! know about a target class, a mixin or an interface is answered by a
//! [`TypeCatalog`]: declared members and their flags, base types,
//! implemented interfaces, and the mixin base shape. [`InMemoryCatalog`]
//! is the stock implementation, buildable in code or loaded from TOML.

mod catalog;
mod error;
mod info;
mod memory;
mod names;

pub use catalog::{CatalogMember, TypeCatalog};
pub use error::CatalogError;
pub use info::{AttributeInfo, MemberInfo, MixinBase, OverrideMarker, TypeInfo, TypeKind};
pub use memory::InMemoryCatalog;
pub use names::{MemberKind, MemberRef, Signature, TypeName, Visibility};
