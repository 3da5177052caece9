use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "context", rename_all = "lowercase")]
pub enum Context {
    Submit { collection: Option<String> },
}

impl Context {
    /// A submission that failed before it was tied to a collection.
    pub fn submit() -> Context {
        Context::Submit { collection: None }
    }

    pub fn submit_to(collection: impl Into<String>) -> Context {
        Context::Submit {
            collection: Some(collection.into()),
        }
    }
}
