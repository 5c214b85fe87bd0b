use anyhow::Result;
use serde::Deserialize;

use crate::interpret::InterpreterConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
    pub upload: UploadConfig,
    pub interpreter: InterpreterSection,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Owner identifier for this session, if signed in
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct UploadConfig {
    pub endpoint: String,
    /// Destination prefix for uploaded recordings
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct InterpreterSection {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Interpreter client configuration. The API key comes from the
    /// environment, never from the file.
    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig::new(
            None,
            self.interpreter.model.clone(),
            self.interpreter.temperature,
            self.interpreter.max_tokens,
        )
    }
}
