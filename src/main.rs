use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use tokio::sync::mpsc;
use warp::Filter;

use directory::config::{get_variable, get_variable_or, parse_variable, StoreKind, DEFAULT_COLLECTION};
use directory::environment::{Config, Environment, SharedStore};
use directory::routes;
use directory::store::{MemoryStore, PgStore};
use log::{info, initialize_logger, warn, Logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = parse_variable("DIRECTORY_PORT");
    let admin_port: u16 = parse_variable("DIRECTORY_ADMIN_PORT");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let store_kind: StoreKind = get_variable_or("DIRECTORY_STORE", "postgres").parse()?;
    let store = make_store(&logger, store_kind).await?;

    let config = Config::new(get_variable_or("DIRECTORY_COLLECTION", DEFAULT_COLLECTION));
    info!(logger, "Using collection"; "collection" => config.collection());

    let environment = Environment::new(logger.clone(), store, config);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            // the receiver only goes away once shutdown has begun
            let _ = termination_sender.send(()).await;
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let logger2 = logger.clone();

        let home_route = routes::make_home_route(environment.clone());
        let form_route = routes::make_form_route(environment.clone());
        let submit_route = routes::make_submit_route(environment.clone());
        let listing_route = routes::make_listing_route(environment.clone());

        let routes = home_route
            .or(form_route)
            .or(submit_route)
            .or(listing_route)
            .recover(move |r| routes::format_rejection(logger2.clone(), r));

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}

async fn make_store(logger: &Logger, kind: StoreKind) -> Result<SharedStore, sqlx::Error> {
    match kind {
        StoreKind::Memory => {
            warn!(logger, "Using the in-memory store; entries are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Postgres => {
            info!(logger, "Creating database pool...");
            let connection_string = get_variable("DIRECTORY_DB_CONNECTION_STRING");
            let pool = sqlx::PgPool::connect(&connection_string).await?;

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
