//! Post JSON Demo
//!
//! Every three seconds, POSTs a JSON greeting to `<base>/<timestamp>` with a
//! repeated query key, and aborts the call if it takes longer than 500 ms.
//!
//! ```text
//! cargo run -p post-json-demo -- http://localhost:8080
//! ```

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fetchain::middleware::{POST, abortable, json, query};
use fetchain::prelude::*;

const ABORT_AFTER: Duration = Duration::from_millis(500);
const PERIOD: Duration = Duration::from_secs(3);

async fn send_greeting(api: &Api) -> Result<()> {
    let controller = AbortController::new();
    let timer = controller.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ABORT_AFTER).await;
        timer.abort();
    });

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();

    let params = Query::new()
        .param("hello", ["Bing", "Dwen", "Dwen"])
        .param("world", "2022");

    let response = api
        .at(
            &format!("/{timestamp}"),
            chain![
                POST,
                json(serde_json::json!({ "hello": "world" })),
                query(params),
                abortable(&controller),
            ],
        )
        .await?;

    println!("{} {}", response.status(), response.status_text());
    println!("{}", response.text().unwrap_or_default());
    Ok(())
}

#[tokio::main]
async fn main() {
    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8080".to_string());
    let api = fetchain::api(base);

    let mut ticks = tokio::time::interval(PERIOD);
    loop {
        ticks.tick().await;
        if let Err(err) = send_greeting(&api).await {
            println!("{err}");
        }
    }
}
