//! http form service.
//!
//! GET / answers a page with the parameter form followed by the result of the request carried in the query string.
//! The process wide generator is seeded once at startup, each request locks it only to seed its own generator,
//! so requests run independently on blocking threads.

use axum::Router;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use std::sync::Arc;

use super::request::RunRequest;
use crate::render::RenderConfig;

const FORM: &str = "<h1>K-means demo</h1>
<p>A tool for creating a 2D exhaustive partitional clustering using K-means and euclidian distance</p>
<form action='.' method='get'>
    <b>K</b>: <input type='text' name='k'></input><br/>
    <b>Points</b>: <input type='text' name='points'></input></br>
    <b>Max iterations</b> (0 defaults to infinite): <input type='text' name='limit' value='0'></input></br>
    <b>Normal distribution?</b> Leave these blank if you want an even distribution.</br />
    <b>Deviation X</b>: <input type='text' name='devx'></input>
    <b>Deviation Y</b>: <input type='text' name='devy'></input></br>
    <b>Mean X</b>: <input type='text' name='meanx'></input>
    <b>Mean Y</b>: <input type='text' name='meany'></input></br>
    <button type='submit'>Visualize!</button>
</form>";

/// state shared by requests
#[derive(Clone)]
pub struct ServerState {
    rng: Arc<Mutex<Xoshiro256PlusPlus>>,
    config: RenderConfig,
}

impl ServerState {
    pub fn new(seed: u64, config: RenderConfig) -> Self {
        ServerState {
            rng: Arc::new(Mutex::new(Xoshiro256PlusPlus::seed_from_u64(seed))),
            config,
        }
    }

    // a generator for one request
    fn fork_rng(&self) -> Xoshiro256PlusPlus {
        let mut rng = self.rng.lock();
        Xoshiro256PlusPlus::from_rng(&mut *rng)
    }
} // end of impl ServerState

/// the form followed by the result or the error message of the request
pub fn render_page<R: Rng + ?Sized>(request: &RunRequest, rng: &mut R, config: &RenderConfig) -> String {
    let mut page = String::from(FORM);
    match request.execute(rng, config) {
        Ok(Some(report)) => page.push_str(report.get_html()),
        Ok(None) => {}
        Err(e) => {
            log::info!("rejected request {:?} : {}", request, e);
            page.push_str(&format!("<span style='color:red'><b>{}</b></span>", e));
        }
    }
    page
}

pub async fn kmeans_handler(State(state): State<ServerState>, Query(request): Query<RunRequest>) -> Html<String> {
    log::debug!("got request {:?}", request);
    let mut rng = state.fork_rng();
    let config = state.config;
    let job = tokio::task::spawn_blocking(move || render_page(&request, &mut rng, &config));
    match job.await {
        Ok(page) => Html(page),
        Err(e) => {
            log::error!("kmeans job failed : {}", e);
            Html(format!(
                "{}<span style='color:red'><b>internal error</b></span>",
                FORM
            ))
        }
    }
} // end of kmeans_handler

pub fn router(state: ServerState) -> Router {
    Router::new().route("/", get(kmeans_handler)).with_state(state)
}

/// blocks serving requests on port
pub fn serve(port: u16, state: ServerState) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
        log::info!("serving kmeans form on port {}", port);
        axum::serve(listener, router(state)).await?;
        Ok::<(), anyhow::Error>(())
    })
} // end of serve

// end of mod tests
