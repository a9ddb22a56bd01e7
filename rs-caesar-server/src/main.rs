use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{delete, get, middleware, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use rs_caesar_core::analysis::ranker::{
	best_candidate, pattern_ranking, quality_best_shift, rank_shifts_with, RankOptions, ScoreResult,
	PATTERN_VIEW_TOP_N,
};
use rs_caesar_core::analysis::report::{AnalysisReport, FrequencySummary, LiveStats};
use rs_caesar_core::analysis::scorer::combined_score;
use rs_caesar_core::samples::random_sample;
use rs_caesar_core::{decode, CaesarError, Shift};

mod config;
mod history;

use config::ServerConfig;
use history::{History, RECENT_ENTRIES};

/// Query parameters shared by the analysis endpoints.
#[derive(Deserialize)]
struct TextQuery {
	text: Option<String>,
}

impl TextQuery {
	fn text(&self) -> &str {
		self.text.as_deref().unwrap_or_default()
	}
}

/// Query parameters of `/v1/decode`.
#[derive(Deserialize)]
struct DecodeQuery {
	text: Option<String>,
	shift: Option<i64>,
}

/// Query parameters of `/v1/rank`.
#[derive(Deserialize)]
struct RankQuery {
	text: Option<String>,
	limit: Option<usize>,
	parallel: Option<bool>,
}

impl RankQuery {
	/// Turns the query into ranking options.
	fn options(&self) -> Result<RankOptions, String> {
		let mut options = RankOptions::default();
		options.parallel = self.parallel.unwrap_or(false);
		if let Some(limit) = self.limit {
			options.set_limit(limit)?;
		}
		Ok(options)
	}
}

/// Query parameters of `/v1/best`.
#[derive(Deserialize)]
struct BestQuery {
	text: Option<String>,
	mode: Option<String>,
}

/// Query parameters of `/v1/report`.
#[derive(Deserialize)]
struct ReportQuery {
	text: Option<String>,
	format: Option<String>,
}

/// A ranked candidate with its display confidence.
#[derive(Serialize)]
struct CandidateView {
	shift: Shift,
	score: f64,
	confidence: f64,
	plaintext: String,
}

impl From<ScoreResult> for CandidateView {
	fn from(result: ScoreResult) -> Self {
		Self {
			confidence: result.confidence(),
			shift: result.shift,
			score: result.score,
			plaintext: result.plaintext,
		}
	}
}

/// State shared between workers.
struct SharedData {
	history: History,
}

/// Maps an engine error to an HTTP response.
fn error_response(error: &CaesarError) -> HttpResponse {
	match error {
		CaesarError::InvalidShift(_) => HttpResponse::BadRequest().body(error.to_string()),
		CaesarError::InsufficientData => HttpResponse::UnprocessableEntity().body(error.to_string()),
		CaesarError::Serialization(_) => HttpResponse::InternalServerError().body(error.to_string()),
	}
}

/// Appends to the history, logging instead of failing when the lock is poisoned.
fn record(data: &web::Data<Mutex<SharedData>>, action: &str, score: f64, input: &str, output: &str) {
	match data.lock() {
		Ok(mut shared_data) => shared_data.history.record(action, score, input, output),
		Err(_) => warn!("history lock failed, dropping entry '{action}'"),
	}
}

/// HTTP GET endpoint `/v1/decode`
///
/// Decodes the text with the given shift and returns live statistics.
#[get("/v1/decode")]
async fn get_decode(data: web::Data<Mutex<SharedData>>, query: web::Query<DecodeQuery>) -> impl Responder {
	let shift = match query.shift {
		Some(value) => match Shift::new(value) {
			Ok(shift) => shift,
			Err(e) => return error_response(&e),
		},
		None => return HttpResponse::BadRequest().body("Missing shift"),
	};
	let text = query.text.as_deref().unwrap_or_default();

	let stats = LiveStats::compute(text, shift);
	record(&data, &format!("Manual decode with shift {shift}"), stats.quality, text, &stats.decoded);
	HttpResponse::Ok().json(stats)
}

/// HTTP GET endpoint `/v1/rank`
///
/// Returns every candidate (or the `limit` best) sorted by combined score.
#[get("/v1/rank")]
async fn get_rank(data: web::Data<Mutex<SharedData>>, query: web::Query<RankQuery>) -> impl Responder {
	let options = match query.options() {
		Ok(o) => o,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	let text = query.text.as_deref().unwrap_or_default();

	let ranked = rank_shifts_with(text, &options);
	let Some(best) = ranked.first() else {
		return error_response(&CaesarError::InsufficientData);
	};
	record(&data, &format!("Ranked shifts, best {}", best.shift), best.score, text, &best.plaintext);

	let views: Vec<CandidateView> = ranked.into_iter().map(CandidateView::from).collect();
	HttpResponse::Ok().json(views)
}

/// HTTP GET endpoint `/v1/best`
///
/// Returns the most probable shift and its plaintext. `mode=quick` picks the
/// shift on the quality score alone.
#[get("/v1/best")]
async fn get_best(data: web::Data<Mutex<SharedData>>, query: web::Query<BestQuery>) -> impl Responder {
	let text = query.text.as_deref().unwrap_or_default();
	let best = match query.mode.as_deref() {
		None | Some("full") => best_candidate(text),
		Some("quick") => quality_best_shift(text).map(|shift| {
			let plaintext = decode(text, shift);
			ScoreResult { shift, score: combined_score(&plaintext).total(), plaintext }
		}),
		Some(other) => return HttpResponse::BadRequest().body(format!("Unknown mode '{other}', expected 'full' or 'quick'")),
	};

	match best {
		Some(best) => {
			record(&data, &format!("Auto-detected shift {}", best.shift), best.score, text, &best.plaintext);
			HttpResponse::Ok().json(CandidateView::from(best))
		}
		None => error_response(&CaesarError::InsufficientData),
	}
}

/// HTTP GET endpoint `/v1/patterns`
///
/// Returns the shifts with the most common patterns in their plaintext.
#[get("/v1/patterns")]
async fn get_patterns(query: web::Query<TextQuery>) -> impl Responder {
	let mut ranking = pattern_ranking(query.text());
	if ranking.is_empty() {
		return error_response(&CaesarError::InsufficientData);
	}
	ranking.truncate(PATTERN_VIEW_TOP_N);
	HttpResponse::Ok().json(ranking)
}

/// HTTP GET endpoint `/v1/frequency`
#[get("/v1/frequency")]
async fn get_frequency(query: web::Query<TextQuery>) -> impl Responder {
	match FrequencySummary::build(query.text()) {
		Ok(summary) => HttpResponse::Ok().json(summary),
		Err(e) => error_response(&e),
	}
}

/// HTTP GET endpoint `/v1/report`
///
/// Full analysis report, as JSON (default) or plain text (`format=text`).
#[get("/v1/report")]
async fn get_report(query: web::Query<ReportQuery>) -> impl Responder {
	let text = query.text.as_deref().unwrap_or_default();
	let report = match AnalysisReport::build(text) {
		Ok(r) => r,
		Err(e) => return error_response(&e),
	};

	match query.format.as_deref().map(str::to_lowercase).as_deref() {
		None | Some("json") => match report.to_json() {
			Ok(json) => HttpResponse::Ok().content_type("application/json").body(json),
			Err(e) => error_response(&e),
		},
		Some("text") | Some("txt") => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(report.to_text()),
		Some(other) => HttpResponse::BadRequest().body(format!("Unknown format '{other}', expected 'json' or 'text'")),
	}
}

/// HTTP GET endpoint `/v1/sample`
///
/// Returns a random built-in ciphertext.
#[get("/v1/sample")]
async fn get_sample(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let sample = random_sample();
	record(&data, &format!("Loaded sample: {}", sample.name), 0.0, sample.ciphertext, "");
	HttpResponse::Ok().json(sample)
}

/// HTTP GET endpoint `/v1/history`
///
/// Exports the whole history as JSON, oldest first.
#[get("/v1/history")]
async fn get_history(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("History lock failed"),
	};
	match shared_data.history.to_json() {
		Ok(json) => HttpResponse::Ok().content_type("application/json").body(json),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to export history: {e}")),
	}
}

/// HTTP GET endpoint `/v1/history/recent`
///
/// The ten newest entries, newest first.
#[get("/v1/history/recent")]
async fn get_recent_history(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("History lock failed"),
	};
	HttpResponse::Ok().json(shared_data.history.recent(RECENT_ENTRIES))
}

/// HTTP DELETE endpoint `/v1/history`
#[delete("/v1/history")]
async fn delete_history(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("History lock failed"),
	};
	let cleared = shared_data.history.len();
	shared_data.history.clear();
	info!("history cleared ({cleared} entries)");
	HttpResponse::Ok().body("History cleared")
}

/// Registers every endpoint on an actix service config.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_decode)
		.service(get_rank)
		.service(get_best)
		.service(get_patterns)
		.service(get_frequency)
		.service(get_report)
		.service(get_sample)
		.service(get_history)
		.service(get_recent_history)
		.service(delete_history);
}

/// Main entry point for the server.
///
/// Wraps the history in a `Mutex` shared by all workers and starts an
/// Actix-web HTTP server on the address given by `ServerConfig`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	info!("listening on {}:{}", config.host, config.port);

	let shared_data = web::Data::new(Mutex::new(SharedData { history: History::new() }));

	HttpServer::new(move || {
		App::new()
			.app_data(shared_data.clone())
			.wrap(Cors::permissive())
			.wrap(middleware::Logger::default())
			.configure(configure)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test;

	const QUOTE: &str = "WKH%20TXLFN%20EURZQ%20IRA%20MXPSV%20RYHU%20WKH%20ODCB%20GRJ.";

	fn shared() -> web::Data<Mutex<SharedData>> {
		web::Data::new(Mutex::new(SharedData { history: History::new() }))
	}

	#[actix_web::test]
	async fn test_decode_endpoint() {
		let data = shared();
		let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/decode?text=KHOOR%20ZRUOG&shift=3").to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["decoded"], "HELLO WORLD");
		assert_eq!(body["shift"], 3);
		assert_eq!(data.lock().unwrap().history.len(), 1);

		let req = test::TestRequest::get().uri("/v1/decode?text=abc&shift=0").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/v1/decode?text=abc").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_rank_and_best_endpoints() {
		let app = test::init_service(App::new().app_data(shared()).configure(configure)).await;

		let req = test::TestRequest::get().uri(&format!("/v1/rank?text={QUOTE}&limit=5")).to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		let candidates = body.as_array().unwrap();
		assert_eq!(candidates.len(), 5);
		assert_eq!(candidates[0]["shift"], 3);

		let req = test::TestRequest::get().uri(&format!("/v1/best?text={QUOTE}")).to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["shift"], 3);
		assert_eq!(body["plaintext"], "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG.");

		let req = test::TestRequest::get().uri(&format!("/v1/rank?text={QUOTE}&limit=0")).to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_parallel_rank_matches_sequential() {
		let app = test::init_service(App::new().app_data(shared()).configure(configure)).await;

		let req = test::TestRequest::get().uri(&format!("/v1/rank?text={QUOTE}")).to_request();
		let sequential = test::call_and_read_body(&app, req).await;
		let req = test::TestRequest::get().uri(&format!("/v1/rank?text={QUOTE}&parallel=true")).to_request();
		let parallel = test::call_and_read_body(&app, req).await;
		assert_eq!(parallel, sequential);
	}

	#[actix_web::test]
	async fn test_best_quick_mode() {
		let app = test::init_service(App::new().app_data(shared()).configure(configure)).await;

		let req = test::TestRequest::get().uri(&format!("/v1/best?text={QUOTE}&mode=quick")).to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["shift"], 3);
		assert_eq!(body["plaintext"], "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG.");

		let req = test::TestRequest::get().uri(&format!("/v1/best?text={QUOTE}&mode=slow")).to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/v1/best?text=123&mode=quick").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
	}

	#[actix_web::test]
	async fn test_frequency_endpoint() {
		let app = test::init_service(App::new().app_data(shared()).configure(configure)).await;

		let req = test::TestRequest::get().uri(&format!("/v1/frequency?text={QUOTE}")).to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
		let body: serde_json::Value = test::read_body_json(resp).await;

		assert_eq!(body["statistics"]["letters"], 35);
		assert_eq!(body["top_letters"][0]["letter"], "R");
		assert_eq!(body["top_letters"].as_array().unwrap().len(), 10);
		assert_eq!(body["shift_quality"].as_array().unwrap().len(), 25);
		assert_eq!(body["shift_quality"][0][0], 1);
		// n-gram tables serialize as maps
		assert_eq!(body["digrams"]["WK"], 2);
		assert_eq!(body["digrams"]["KH"], 2);
		assert!(body["trigrams"].is_object());
	}

	#[actix_web::test]
	async fn test_empty_text_is_unprocessable() {
		let app = test::init_service(App::new().app_data(shared()).configure(configure)).await;
		for uri in ["/v1/rank?text=", "/v1/best?text=%20%20", "/v1/patterns", "/v1/frequency?text=123", "/v1/report"] {
			let req = test::TestRequest::get().uri(uri).to_request();
			let resp = test::call_service(&app, req).await;
			assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
		}
	}

	#[actix_web::test]
	async fn test_report_formats() {
		let app = test::init_service(App::new().app_data(shared()).configure(configure)).await;

		let req = test::TestRequest::get().uri(&format!("/v1/report?text={QUOTE}&format=text")).to_request();
		let body = test::call_and_read_body(&app, req).await;
		let text = String::from_utf8(body.to_vec()).unwrap();
		assert!(text.contains("Rank 1: Shift 3"));

		let req = test::TestRequest::get().uri(&format!("/v1/report?text={QUOTE}")).to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["analysis"].as_object().unwrap().len(), 25);

		let req = test::TestRequest::get().uri(&format!("/v1/report?text={QUOTE}&format=pdf")).to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_patterns_limited_to_view_size() {
		let app = test::init_service(App::new().app_data(shared()).configure(configure)).await;
		let req = test::TestRequest::get().uri(&format!("/v1/patterns?text={QUOTE}")).to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body.as_array().unwrap().len(), PATTERN_VIEW_TOP_N);
	}

	#[actix_web::test]
	async fn test_history_roundtrip() {
		let data = shared();
		let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/sample").to_request();
		let sample: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert!(sample["ciphertext"].is_string());

		let req = test::TestRequest::get().uri("/v1/history").to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		let entries = body.as_array().unwrap();
		assert_eq!(entries.len(), 1);
		assert!(entries[0]["action"].as_str().unwrap().starts_with("Loaded sample: "));

		let req = test::TestRequest::get().uri("/v1/history/recent").to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body.as_array().unwrap().len(), 1);

		let req = test::TestRequest::delete().uri("/v1/history").to_request();
		let resp = test::call_service(&app, req).await;
		assert!(resp.status().is_success());
		assert_eq!(data.lock().unwrap().history.len(), 0);
	}
}
