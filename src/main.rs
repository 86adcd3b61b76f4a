#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;

use tic_tac_toe_minimax::bot::Bot;
use tic_tac_toe_minimax::config::Config;
use tic_tac_toe_minimax::metrics::TrackingAllocator;

mod handler;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[launch]
fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Tic-Tac-Toe Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let bot = Bot::new(config);

    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "tic-tac-toe-minimax");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::new_game,
                handler::get_game,
                handler::play_move,
                handler::end_game
            ],
        )
}
