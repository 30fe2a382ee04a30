use std::process;

use iron::Iron;
use log::{error, info};

use masterblog::{app, Config, PostStore};

// RUST_LOG=info masterblog > logs 2>&1 &
fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let chain = app(PostStore::seeded(), &config);
    let addr = config.socket_addr();

    match Iron::new(chain).http(addr.as_str()) {
        // Dropping the listener waits for the server threads.
        Ok(_listening) => info!("listening on {}", addr),
        Err(e) => {
            error!("could not bind {}: {}", addr, e);
            process::exit(1);
        }
    }
}
