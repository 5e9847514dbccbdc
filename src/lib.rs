use lazy_static::lazy_static;

lazy_static! {
    pub static ref LOG: u64 = init_log();
}

// install a logger facility
fn init_log() -> u64 {
    let _res = env_logger::try_init();
    log::info!("logger initialized");
    1
}

pub mod front;
pub mod generate;
pub mod kmeans;
pub mod render;
