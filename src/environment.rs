use std::sync::Arc;

use log::Logger;

use crate::entry::SubmissionForm;
use crate::store::Store;
use crate::submission::SubmissionWorkflow;

pub type SharedStore = Arc<dyn Store + Send + Sync>;

/// Everything a route handler needs, cloned into each request.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub store: SharedStore,
    pub config: Config,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, store: SharedStore, config: Config) -> Self {
        Self {
            logger,
            store,
            config,
        }
    }

    /// Starts a submission workflow for `form` against this
    /// environment's store and collection.
    pub fn workflow(&self, logger: Arc<Logger>, form: SubmissionForm) -> SubmissionWorkflow {
        SubmissionWorkflow::with_form(self.store.clone(), self.config.collection.clone(), logger, form)
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) collection: String,
}

impl Config {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}
