use std::time::{Duration, Instant};

use log::debug;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::entry::{Field, SubmissionForm};
use crate::environment::Environment;
use crate::errors::{BackendError, WorkflowError};
use crate::listing::{load_listing, ListedEntry};
use crate::routes::{
    rejection::{Context, Rejection},
    response::{Action, FormField, SubmissionErrors, SuccessResponse},
};
use crate::submission::{SubmissionState, LISTING_PATH};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

const TITLE: &str = "The Fade";
const TAGLINE: &str = "The global directory of Black barbershops.";
const SUBMIT_PATH: &str = "/submit";

macro_rules! timed {
    ($body:block) => {{
        let start = Instant::now();

        // rejections leave through `?` and carry no timing header
        let result = $body;

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    }};
}

pub async fn home(_environment: Environment) -> RouteResult {
    timed!({
        json(&SuccessResponse::Home {
            title: TITLE,
            tagline: TAGLINE,
            actions: vec![
                Action {
                    label: "Add a Barbershop",
                    path: SUBMIT_PATH,
                },
                Action {
                    label: "View All Shops",
                    path: LISTING_PATH,
                },
            ],
        })
    })
}

pub async fn form(_environment: Environment) -> RouteResult {
    timed!({
        let fields = Field::ALL.iter().copied().map(FormField::from).collect();

        json(&SuccessResponse::Form { fields })
    })
}

pub async fn submit(environment: Environment, form: SubmissionForm) -> RouteResult {
    timed!({
        let collection = environment.config.collection().to_owned();
        let logger = environment.logger.clone();

        debug!(logger, "Processing submission..."; "collection" => &collection);
        let mut workflow = environment.workflow(logger.clone(), form);

        workflow
            .submit()
            .await
            .map_err(|e| Rejection::new(Context::submit_to(collection.clone()), BackendError::from(e)))?;

        match workflow.state() {
            SubmissionState::Submitted { id } => {
                debug!(logger, "Sending response..."; "id" => %id);

                with_status(
                    json(&SuccessResponse::Submitted {
                        id: *id,
                        listing: LISTING_PATH,
                    }),
                    StatusCode::CREATED,
                )
            }
            SubmissionState::Editing {
                form,
                errors,
                banner: None,
            } => with_status(
                json(&SubmissionErrors::new(form, errors, None)),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            SubmissionState::Editing {
                form,
                errors,
                banner,
            } => with_status(
                json(&SubmissionErrors::new(form, errors, *banner)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            other => {
                let e = WorkflowError::UnexpectedPhase {
                    action: "respond",
                    phase: other.phase().name(),
                };

                return Err(Rejection::new(Context::submit_to(collection), BackendError::from(e)).into());
            }
        }
    })
}

pub async fn listing(environment: Environment) -> RouteResult {
    timed!({
        let listing = load_listing(
            &environment.store,
            environment.config.collection(),
            &environment.logger,
        )
        .await;

        let shops = listing.entries().iter().map(ListedEntry::from).collect();

        json(&SuccessResponse::Listing { shops })
    })
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
