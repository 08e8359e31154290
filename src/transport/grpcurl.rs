//! grpcurl command construction

use serde_json::Value;

/// grpcurl command options
#[derive(Clone, Debug, Default)]
pub struct GrpcurlOptions {
    pub plaintext: bool,
    pub headers: Vec<(String, String)>,
}

impl GrpcurlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plaintext(mut self, plaintext: bool) -> Self {
        self.plaintext = plaintext;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Arguments for `grpcurl`, excluding the program name
    pub fn build_args(&self, address: &str, method: &str, body: &Value) -> Vec<String> {
        let mut args = vec!["-emit-defaults".to_string()];

        if self.plaintext {
            args.push("-plaintext".to_string());
        }

        for (key, value) in &self.headers {
            args.push("-H".to_string());
            args.push(format!("{key}: {value}"));
        }

        args.push("-d".to_string());
        args.push(body.to_string());
        args.push(address.to_string());
        args.push(method.to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_args_tls() {
        let args = GrpcurlOptions::new().build_args("testHost:443", "GetOffer", &json!({"offer_id": "x"}));
        assert_eq!(
            args,
            vec![
                "-emit-defaults",
                "-d",
                r#"{"offer_id":"x"}"#,
                "testHost:443",
                "GetOffer"
            ]
        );
    }

    #[test]
    fn test_build_args_plaintext_with_headers() {
        let args = GrpcurlOptions::new()
            .plaintext(true)
            .header("authorization", "Bearer t")
            .build_args("localhost:50051", "pkg.Svc/GetOffers", &json!({}));
        assert_eq!(args[0], "-emit-defaults");
        assert_eq!(args[1], "-plaintext");
        assert_eq!(args[2], "-H");
        assert_eq!(args[3], "authorization: Bearer t");
        assert_eq!(args.last().map(String::as_str), Some("pkg.Svc/GetOffers"));
    }
}
