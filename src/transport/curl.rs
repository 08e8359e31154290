//! curl command construction

/// Curl command options
#[derive(Clone, Debug, Default)]
pub struct CurlOptions {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl CurlOptions {
    pub fn new() -> Self {
        Self {
            method: "GET".to_string(),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    fn has_content_type(&self) -> bool {
        self.headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case("content-type"))
    }

    /// Arguments for `curl`, excluding the program name
    pub fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec!["-s".to_string(), "-X".to_string(), self.method.clone()];

        if let Some(timeout) = self.timeout_secs {
            args.push("-m".to_string());
            args.push(timeout.to_string());
        }

        for (key, value) in &self.headers {
            args.push("-H".to_string());
            args.push(format!("{key}: {value}"));
        }

        if let Some(body) = &self.body {
            if !self.has_content_type() {
                args.push("-H".to_string());
                args.push("Content-Type: application/json".to_string());
            }
            args.push("-d".to_string());
            args.push(body.clone());
        }

        args.push(url.to_string());
        args
    }
}
