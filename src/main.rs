mod app;
mod click;
mod config;
mod cta;
mod neko;
mod overlay;
mod render;
mod rng;
mod scheduler;

fn main() {
    env_logger::init();
    log::info!("Neko starting up");

    let config = config::Config::from_env();
    if config.reduced_motion {
        log::info!("Reduced motion requested, companion disabled");
        return;
    }

    if let Err(e) = app::run(&config) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
