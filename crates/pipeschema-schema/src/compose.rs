//! # Schema Composition
//!
//! Orchestrates the stages over one exclusively-owned definitions table:
//!
//! 1. Reflect the root type; its fragment seeds the table and must contain
//!    the abstract step placeholder.
//! 2. Reflect every step variant and every hook/modifier type.
//! 3. Append each variant's descriptor to the placeholder's `anyOf`.
//! 4. Merge each variant's sub-definitions, then each modifier's.
//!    Modifiers never join the union.
//! 5. Inject the hook properties into every variant definition.
//! 6. Relax the placeholder.
//!
//! Same-named definitions that differ between fragments are logged before
//! merging, since merge keeps whichever arrives first.

use tracing::{debug, warn};

use crate::document::{Definitions, SchemaDocument};
use crate::error::SchemaError;
use crate::hooks::{self, HookProperty, STEP_DEFINITION};
use crate::merge::{conflicting_definitions, merge};
use crate::reflect::{Fragment, Reflect};
use crate::relax::relax;
use crate::union::build_union;

/// Assembles a schema document from a root type, step variants and
/// hook/modifier types.
#[derive(Debug, Clone)]
pub struct SchemaComposer {
    placeholder: String,
    hooks: Vec<HookProperty>,
}

impl Default for SchemaComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaComposer {
    /// A composer targeting the `Step` placeholder with the 9 pipeline hooks.
    pub fn new() -> Self {
        Self {
            placeholder: STEP_DEFINITION.to_string(),
            hooks: hooks::pipeline_hooks(),
        }
    }

    /// Replace the injected hook properties.
    pub fn with_hooks(mut self, hooks: Vec<HookProperty>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Name of the placeholder definition the union is built on.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Run every composition stage.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Reflection`] when any type fails to reflect.
    /// - [`SchemaError::MissingDefinition`] when the root fragment lacks the
    ///   placeholder.
    /// - [`SchemaError::UnnamedVariant`] when a variant reflects inline.
    /// - [`SchemaError::EmptyUnion`] when `variants` is empty.
    pub fn compose(
        &self,
        root: &dyn Reflect,
        variants: &[&dyn Reflect],
        modifiers: &[&dyn Reflect],
    ) -> Result<SchemaDocument, SchemaError> {
        let root_fragment = root.reflect()?;
        let variant_fragments = reflect_all(variants)?;
        let modifier_fragments = reflect_all(modifiers)?;

        let all_fragments = std::iter::once(&root_fragment)
            .chain(variant_fragments.iter().map(|(_, fragment)| fragment))
            .chain(modifier_fragments.iter().map(|(_, fragment)| fragment));
        for name in conflicting_definitions(all_fragments) {
            warn!(
                definition = %name,
                "definition reflected with conflicting shapes; keeping the first"
            );
        }

        let mut document = SchemaDocument::new(
            root_fragment.top_level.into_definition(),
            root_fragment.definitions,
        );
        debug!(
            root = root.type_name(),
            definitions = document.definitions.len(),
            "reflected root type"
        );

        let placeholder = document
            .definitions
            .get_mut(&self.placeholder)
            .ok_or_else(|| SchemaError::MissingDefinition {
                name: self.placeholder.clone(),
                context: "root reflection",
            })?;

        let (descriptors, variant_definitions): (Vec<_>, Vec<_>) = variant_fragments
            .into_iter()
            .map(|(type_name, fragment)| ((type_name, fragment.top_level), fragment.definitions))
            .unzip();
        let variant_names = build_union(placeholder, descriptors)?;
        debug!(variants = ?variant_names, "built step union");

        merge_all(&mut document.definitions, variant_definitions, "variant");
        merge_all(
            &mut document.definitions,
            modifier_fragments
                .into_iter()
                .map(|(_, fragment)| fragment.definitions),
            "modifier",
        );

        hooks::inject(&self.hooks, &variant_names, &mut document.definitions)?;
        debug!(hooks = self.hooks.len(), "injected hook properties");

        relax(&mut document.definitions, &self.placeholder)?;
        debug!(
            definitions = document.definitions.len(),
            "composed schema document"
        );
        Ok(document)
    }
}

fn reflect_all(types: &[&dyn Reflect]) -> Result<Vec<(&'static str, Fragment)>, SchemaError> {
    types
        .iter()
        .map(|reflector| -> Result<_, SchemaError> {
            Ok((reflector.type_name(), reflector.reflect()?))
        })
        .collect()
}

fn merge_all(
    target: &mut Definitions,
    incoming: impl IntoIterator<Item = Definitions>,
    source: &'static str,
) {
    for definitions in incoming {
        let outcome = merge(target, definitions);
        debug!(
            source,
            added = ?outcome.added,
            discarded = outcome.discarded.len(),
            "merged definitions"
        );
    }
}
