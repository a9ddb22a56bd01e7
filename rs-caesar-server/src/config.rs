use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Address the HTTP server binds to.
///
/// Read from `CAESAR_HOST` and `CAESAR_PORT`, defaulting to `127.0.0.1:5000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
}

impl ServerConfig {
	/// Reads the configuration from the environment.
	///
	/// # Errors
	/// Returns an error if `CAESAR_PORT` is set but is not a valid port.
	pub fn from_env() -> Result<Self, String> {
		Self::from_values(env::var("CAESAR_HOST").ok(), env::var("CAESAR_PORT").ok())
	}

	/// Builds the configuration from optional raw values.
	pub fn from_values(host: Option<String>, port: Option<String>) -> Result<Self, String> {
		let host = match host {
			Some(h) if !h.trim().is_empty() => h.trim().to_owned(),
			_ => DEFAULT_HOST.to_owned(),
		};
		let port = match port {
			Some(p) => p.trim().parse::<u16>().map_err(|_| format!("Invalid port: {p}"))?,
			None => DEFAULT_PORT,
		};
		Ok(Self { host, port })
	}
}
