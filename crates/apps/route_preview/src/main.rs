use std::env;
use std::path::PathBuf;

use animation::{Phase, RouteAnimationConfig, start_route_animation};
use clap::Parser;
use formats::{PlaceTable, feature_collection, source_data_to_geojson};
use layers::{LayerId, MemorySurface, SourceData};
use reqwest::Client;
use runtime::{Frame, ManualScheduler};
use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless preview of the animated route layer")]
struct Args {
    /// Place table: GeoJSON file path or http(s) URL (falls back to ROUTE_PLACES)
    #[arg(long)]
    places: Option<String>,

    /// Animation config JSON (falls back to ROUTE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Simulated run length in ms (default: full reveal plus two dot laps)
    #[arg(long)]
    run_ms: Option<f64>,

    /// Hide the document at this time (ms)
    #[arg(long)]
    hide_at: Option<f64>,

    /// Show the document again at this time (ms)
    #[arg(long)]
    show_at: Option<f64>,

    /// Write the final line and dot payloads as GeoJSON
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config_path = args
        .config
        .clone()
        .or_else(|| env::var("ROUTE_CONFIG").ok().map(PathBuf::from));
    let config = match config_path {
        Some(path) => match RouteAnimationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("config load failed: {path:?} -> {err}");
                return Err(err.into());
            }
        },
        None => RouteAnimationConfig::default(),
    };

    let places_source = args.places.clone().or_else(|| env::var("ROUTE_PLACES").ok());
    let client = Client::new();
    let places = match places_source.as_deref() {
        Some(source) => load_places(&client, source).await,
        None => {
            warn!("no place table given (--places or ROUTE_PLACES)");
            None
        }
    };

    let line_source = LayerId::new(&config.layers.line_source);
    let dot_source = LayerId::new(&config.layers.dot_source);
    let lap_ms = config.timing.dot_lap_ms;

    let mut session = start_route_animation(
        MemorySurface::new(),
        ManualScheduler::new(),
        config,
        places.as_ref(),
    );
    if session.phase() == Phase::Idle {
        // Decorative layer: an unavailable route is not a failure.
        info!("route unavailable, nothing to preview");
        return Ok(());
    }

    let run_ms = args
        .run_ms
        .unwrap_or_else(|| session.driver().reveal_total_ms() + 2.0 * lap_ms);
    let mut hide_pending = args.hide_at;
    let mut show_pending = args.show_at;
    let mut last_phase = session.phase();
    let mut frame = Frame::at_rate(0, args.fps);
    let mut fired = 0u64;

    while frame.time.0 <= run_ms {
        if hide_pending.is_some_and(|t| frame.time.0 >= t) {
            hide_pending = None;
            info!(time_ms = frame.time.0, "document hidden");
            session.set_document_visible(false);
        }
        if show_pending.is_some_and(|t| frame.time.0 >= t) {
            show_pending = None;
            info!(time_ms = frame.time.0, "document visible");
            session.set_document_visible(true);
        }

        for id in session.scheduler_mut().take_pending() {
            session.on_frame(id, frame.time);
            fired += 1;
        }

        let phase = session.phase();
        if phase != last_phase {
            info!(frame = frame.index, time_ms = frame.time.0, %phase, "phase changed");
            last_phase = phase;
        }
        frame = frame.next();
    }

    let surface = session.surface();
    info!(
        frames = fired,
        phase = %session.phase(),
        line_writes = surface.write_count(&line_source),
        dot_writes = surface.write_count(&dot_source),
        line_vertices = surface.source(&line_source).map_or(0, SourceData::vertex_count),
        "preview finished"
    );

    if let Some(path) = args.output.as_ref() {
        let mut features = Vec::new();
        for id in [&line_source, &dot_source] {
            if let Some(data) = surface.source(id) {
                features.extend(tagged_features(source_data_to_geojson(data), id));
            }
        }
        let doc = feature_collection(features);
        tokio::fs::write(path, serde_json::to_vec_pretty(&doc)?).await?;
        info!("wrote {path:?}");
    }

    session.dispose();
    Ok(())
}

/// Reads the table from a file or URL. Every failure means "unavailable".
async fn load_places(client: &Client, source: &str) -> Option<PlaceTable> {
    let payload = if source.starts_with("http://") || source.starts_with("https://") {
        let resp = match client.get(source).send().await {
            Ok(resp) => resp,
            Err(err) => {
                warn!("place table GET failed: {source} -> {err}");
                return None;
            }
        };
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "place table unavailable at {source}");
            return None;
        }
        match resp.text().await {
            Ok(text) => text,
            Err(err) => {
                warn!("place table body unreadable: {err}");
                return None;
            }
        }
    } else {
        match tokio::fs::read_to_string(source).await {
            Ok(text) => text,
            Err(err) => {
                warn!("place table read failed: {source} -> {err}");
                return None;
            }
        }
    };

    match PlaceTable::from_geojson_str(&payload) {
        Ok(table) => {
            info!(
                places = table.len(),
                skipped = table.skipped().len(),
                "place table loaded"
            );
            Some(table)
        }
        Err(err) => {
            warn!("place table unusable: {err}");
            None
        }
    }
}

fn tagged_features(collection: Value, source: &LayerId) -> Vec<Value> {
    let Value::Object(mut root) = collection else {
        return Vec::new();
    };
    let Some(Value::Array(mut features)) = root.remove("features") else {
        return Vec::new();
    };
    for feature in &mut features {
        if let Some(Value::Object(props)) = feature.get_mut("properties") {
            props.insert("source".to_string(), Value::String(source.to_string()));
        }
    }
    features
}
