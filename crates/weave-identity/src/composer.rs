use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use weave_catalog::{TypeCatalog, TypeName};
use weave_context::ClassContext;
use weave_definitions::{DefinitionBuilder, TargetClassDefinition};
use weave_validate::{ValidationFailure, ValidationReport, Validator};

use crate::cache::ConcreteTypeCache;
use crate::identifier::ConcreteMixinTypeIdentifier;
use crate::metadata::{ConcreteMixinTypeMetadata, ConcreteTargetMetadata};

/// The downstream collaborator that turns metadata into executable types.
pub trait CodeEmitter {
    type Handle;

    fn emit_mixin_type(&self, metadata: &ConcreteMixinTypeMetadata) -> Result<Self::Handle, EmitError>;

    /// Emits the target subclass once every concrete mixin type it uses
    /// exists. `mixin_types` follows `composition.mixin_types`.
    fn emit_target_type(
        &self,
        composition: &Composition,
        mixin_types: &[Arc<Self::Handle>],
    ) -> Result<Self::Handle, EmitError>;
}

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[error("Code emission failed for `{type_name}`: {message}")]
#[diagnostic(code(weave_identity::emit_failed))]
pub struct EmitError {
    pub type_name: TypeName,
    pub message: String,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ComposeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Emit(#[from] EmitError),
}

/// A validated composition, ready for code generation.
#[derive(Debug, Clone)]
pub struct Composition {
    pub definition: TargetClassDefinition,
    /// The passing report; may still carry warnings.
    pub report: ValidationReport,
    /// One entry per mixin that needs a generated type, in application order.
    pub mixin_types: Vec<ConcreteMixinTypeMetadata>,
    pub target: ConcreteTargetMetadata,
}

impl Composition {
    pub fn identifiers(&self) -> impl Iterator<Item = &ConcreteMixinTypeIdentifier> + '_ {
        self.mixin_types.iter().map(|metadata| &metadata.identifier)
    }

    pub fn mixin_metadata(&self, mixin_type: &TypeName) -> Option<&ConcreteMixinTypeMetadata> {
        self.mixin_types.iter().find(|metadata| metadata.mixin_type() == mixin_type)
    }
}

/// The output of [`Composer::compose_and_generate`].
#[derive(Debug)]
pub struct GeneratedComposition<H> {
    pub composition: Composition,
    pub mixin_types: Vec<Arc<H>>,
    pub target_type: H,
}

/// Runs the whole pipeline for one class context: definition building,
/// resolution, validation, identity computation and, on request, cached
/// code generation.
pub struct Composer<'c, H> {
    catalog: &'c dyn TypeCatalog,
    validator: Validator,
    cache: Arc<ConcreteTypeCache<H>>,
}

impl<'c, H> Composer<'c, H> {
    pub fn new(catalog: &'c dyn TypeCatalog, cache: Arc<ConcreteTypeCache<H>>) -> Self {
        Composer { catalog, validator: Validator::new(), cache }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn cache(&self) -> &Arc<ConcreteTypeCache<H>> {
        &self.cache
    }

    /// Builds and validates the definition of `context`. Nothing past
    /// validation runs for a failing configuration.
    pub fn compose(&self, context: &ClassContext) -> Result<Composition, ValidationFailure> {
        let definition = DefinitionBuilder::new(self.catalog).build(context);
        let report = self.validator.validate(&definition).into_result()?;

        let mixin_types = definition
            .mixin_order
            .iter()
            .filter_map(|mixin| ConcreteMixinTypeMetadata::from_definition(&definition, *mixin))
            .collect();
        let target = ConcreteTargetMetadata::from_definition(&definition);
        Ok(Composition { definition, report, mixin_types, target })
    }

    /// Composes `context` and drives `emitter`, generating each concrete
    /// mixin type through the shared cache.
    pub fn compose_and_generate<E>(
        &self,
        context: &ClassContext,
        emitter: &E,
    ) -> Result<GeneratedComposition<H>, ComposeError>
    where
        E: CodeEmitter<Handle = H>,
    {
        let composition = self.compose(context)?;
        let mut mixin_types = Vec::with_capacity(composition.mixin_types.len());
        for metadata in &composition.mixin_types {
            let handle = self
                .cache
                .try_get_or_generate(&metadata.identifier, |_| emitter.emit_mixin_type(metadata))?;
            mixin_types.push(handle);
        }
        let target_type = emitter.emit_target_type(&composition, &mixin_types)?;
        log::debug!(
            "generated `{}` with {} concrete mixin type(s)",
            composition.target.target,
            mixin_types.len()
        );
        Ok(GeneratedComposition { composition, mixin_types, target_type })
    }
}
