//! Creates or migrates the documents table the directory stores its
//! entries in.

use std::env;

use movine::Movine;
use postgres::{Client, NoTls};

use log::{debug, info, initialize_logger};

const MIGRATION_DIR: &str = "./migrations";

fn main() {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let connection_string = env::var("DIRECTORY_DB_CONNECTION_STRING")
        .expect("could not read DIRECTORY_DB_CONNECTION_STRING");

    debug!(logger, "Connecting to database...");

    let client = Client::connect(&connection_string, NoTls).expect("could not connect to database");

    let mut movine = Movine::new(client);
    movine.set_migration_dir(MIGRATION_DIR);

    if movine.status().is_err() {
        debug!(logger, "Initializing movine...");
        movine.initialize().expect("failed to initialize movine");
    }

    debug!(logger, "Running migrations..."; "dir" => MIGRATION_DIR);
    movine.up().expect("failed to run migrations");

    info!(logger, "Completed initialization."; "version" => info::VERSION);
}
