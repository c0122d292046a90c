//! The immutable analysis input shared by all checkers.

use std::collections::BTreeSet;

use crate::glue::DefinitionRegistry;
use crate::model::{Pickle, SpecificationDocument};

/// Parsed documents, their pickles and the compiled definition registry.
///
/// Built once per inspector; checkers only ever read it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    documents: Vec<SpecificationDocument>,
    pickles: Vec<Vec<Pickle>>,
    registry: DefinitionRegistry,
}

impl Snapshot {
    /// Assemble a snapshot, expanding every document's pickles.
    #[must_use]
    pub fn new(documents: Vec<SpecificationDocument>, registry: DefinitionRegistry) -> Self {
        let pickles = documents
            .iter()
            .map(|document| document.feature().pickles())
            .collect();
        Self {
            documents,
            pickles,
            registry,
        }
    }

    /// Documents in configuration order.
    #[must_use]
    pub fn documents(&self) -> &[SpecificationDocument] {
        &self.documents
    }

    /// The compiled step-definition registry.
    #[must_use]
    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// Every pickle paired with its document.
    pub fn pickles(&self) -> impl Iterator<Item = (&SpecificationDocument, &Pickle)> {
        self.documents
            .iter()
            .zip(&self.pickles)
            .flat_map(|(document, pickles)| pickles.iter().map(move |pickle| (document, pickle)))
    }

    /// Distinct concrete step texts across every document.
    #[must_use]
    pub fn usage_set(&self) -> BTreeSet<&str> {
        self.pickles()
            .flat_map(|(_, pickle)| pickle.steps.iter().map(|step| step.text.as_str()))
            .collect()
    }
}
