use std::sync::Arc;

use log::{debug, error, Logger};
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::{BackendError, WorkflowError};

pub mod admin;
mod handlers;
mod rejection;
mod response;

pub use internal::*;

/// The largest submission body to accept. A filled-in form is a few
/// hundred bytes.
const MAX_CONTENT_LENGTH: u64 = 64 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    let body_error = if rej.find::<BodyDeserializeError>().is_some() {
        Some(BackendError::MalformedFormSubmission)
    } else if rej.find::<reject::UnsupportedMediaType>().is_some() {
        Some(BackendError::UnsupportedMediaType)
    } else {
        None
    };

    if let Some(e) = body_error {
        debug!(logger, "Rejected submission body"; "message" => %e);
        let status = status_code_for(&e);
        let r = rejection::Rejection::new(rejection::Context::submit(), e);

        return Ok(with_status(json(&r.flatten()), status));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        MalformedFormSubmission => StatusCode::BAD_REQUEST,
        UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Workflow(WorkflowError::SubmissionInFlight) => StatusCode::CONFLICT,
        Workflow(..) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::body::content_length_limit;
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{get as g, path as p, post};

    use super::{handlers, MAX_CONTENT_LENGTH};
    use crate::entry::SubmissionForm;
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any().map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    /// A submission sent either as a URL-encoded form or as JSON.
    fn submission() -> BoxedFilter<(SubmissionForm,)> {
        warp::body::json::<SubmissionForm>()
            .or(warp::body::form::<SubmissionForm>())
            .unify()
            .boxed()
    }

    route!(make_home_route => home, rt; end(), g());
    route!(make_form_route => form, rt; p("submit"), end(), g());
    route!(make_submit_route => submit, rt; p("submit"), end(), post(), content_length_limit(MAX_CONTENT_LENGTH), submission());
    route!(make_listing_route => listing, rt; p("shops"), end(), g());
}
