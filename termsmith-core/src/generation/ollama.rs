use super::GenerativeModel;
use crate::config::ModelConfig;
use crate::error::{GenerationError, ModelError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A model served by a local Ollama instance.
///
/// `connect` is the load step: it checks the server is up and the model is
/// installed (pulling it first when `pull_missing` is set). Once connected,
/// every `generate` call is an independent HTTP request with its own timeout.
pub struct OllamaModel {
    agent: ureq::Agent,
    host: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: usize,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<InstalledModel>,
}

#[derive(Debug, Deserialize)]
struct InstalledModel {
    name: String,
}

impl OllamaModel {
    pub fn connect(config: &ModelConfig) -> Result<Self, ModelError> {
        if !config.enabled {
            return Err(ModelError::Disabled);
        }

        let host = config.host.trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build();

        let installed = list_models(&agent, &host)?;
        if !is_installed(&installed, &config.model) {
            if !config.pull_missing {
                return Err(ModelError::NotInstalled {
                    model: config.model.clone(),
                    host,
                });
            }
            pull_model(config, &host)?;
        }

        tracing::info!(model = %config.model, host = %host, "Connected to model server");
        Ok(Self {
            agent,
            host,
            model: config.model.clone(),
        })
    }
}

impl GenerativeModel for OllamaModel {
    fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_output_tokens,
            },
        };

        let response = match self
            .agent
            .post(&format!("{}/api/generate", self.host))
            .send_json(&request)
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                return Err(GenerationError::Status {
                    code,
                    message: error_message(resp),
                })
            }
            Err(e) => return Err(GenerationError::Transport(e.to_string())),
        };

        let body: GenerateResponse = response
            .into_json()
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        let text = body.response.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn list_models(agent: &ureq::Agent, host: &str) -> Result<Vec<String>, ModelError> {
    let response = agent
        .get(&format!("{host}/api/tags"))
        .call()
        .map_err(|e| ModelError::Unreachable {
            host: host.to_string(),
            message: e.to_string(),
        })?;
    let tags: TagsResponse = response
        .into_json()
        .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

fn pull_model(config: &ModelConfig, host: &str) -> Result<(), ModelError> {
    tracing::info!(model = %config.model, "Model not installed, pulling");
    // Downloads can take far longer than a generation call
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.pull_timeout_secs))
        .build();

    agent
        .post(&format!("{host}/api/pull"))
        .send_json(serde_json::json!({
            "name": config.model,
            "stream": false,
        }))
        .map_err(|e| match e {
            ureq::Error::Status(404, _) => ModelError::NotInstalled {
                model: config.model.clone(),
                host: host.to_string(),
            },
            other => ModelError::Unreachable {
                host: host.to_string(),
                message: other.to_string(),
            },
        })?;
    Ok(())
}

/// Installed names carry a tag ("llama3.2:1b", "mistral:latest"); a bare
/// configured name matches any tag of that model.
fn is_installed(installed: &[String], model: &str) -> bool {
    installed.iter().any(|name| {
        name == model
            || (!model.contains(':')
                && name
                    .strip_prefix(model)
                    .is_some_and(|rest| rest.starts_with(':')))
    })
}

fn error_message(response: ureq::Response) -> String {
    let status_text = response.status_text().to_string();
    match response.into_json::<serde_json::Value>() {
        Ok(json) => json["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(status_text),
        Err(_) => status_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_names_match_exactly_or_by_bare_name() {
        let installed = vec!["llama3.2:1b".to_string(), "mistral:latest".to_string()];
        assert!(is_installed(&installed, "llama3.2:1b"));
        assert!(is_installed(&installed, "mistral"));
        assert!(!is_installed(&installed, "llama3.2:3b"));
        assert!(!is_installed(&installed, "llama3"));
    }

    #[test]
    fn request_body_bounds_output_length() {
        let request = GenerateRequest {
            model: "llama3.2:1b",
            prompt: "Simplify this",
            stream: false,
            options: GenerateOptions { num_predict: 50 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["options"]["num_predict"], 50);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn disabled_config_never_connects() {
        let config = ModelConfig {
            enabled: false,
            ..ModelConfig::default()
        };
        assert!(matches!(OllamaModel::connect(&config), Err(ModelError::Disabled)));
    }

    // ============================================================================
    // Canned HTTP server
    // ============================================================================

    use crate::config::PromptConfig;
    use crate::enrichment::DefinitionEnricher;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    /// Serve one reply per connection, in order; the handle yields the
    /// request lines that were received.
    fn serve(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in replies {
                let (mut stream, _) = listener.accept().unwrap();
                seen.push(read_request(&mut stream));
                let reason = if status == 200 { "OK" } else { "Internal Server Error" };
                let reply = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).unwrap();
            }
            seen
        });
        (host, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line.trim().is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();
        request_line.trim_end().to_string()
    }

    fn model_at(host: String) -> OllamaModel {
        OllamaModel {
            agent: ureq::AgentBuilder::new().timeout(Duration::from_secs(5)).build(),
            host,
            model: "llama3.2:1b".to_string(),
        }
    }

    #[test]
    fn server_error_maps_to_status_with_body_message() {
        let (host, server) = serve(vec![(500, r#"{"error":"model crashed"}"#)]);
        let result = model_at(host).generate("hi", 10);
        match result {
            Err(GenerationError::Status { code, message }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "model crashed");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(server.join().unwrap(), vec!["POST /api/generate HTTP/1.1"]);
    }

    #[test]
    fn unreadable_body_is_invalid_response() {
        let (host, server) = serve(vec![(200, "not json")]);
        assert!(matches!(
            model_at(host).generate("hi", 10),
            Err(GenerationError::InvalidResponse(_))
        ));
        server.join().unwrap();
    }

    #[test]
    fn blank_response_is_empty() {
        let (host, server) = serve(vec![(200, r#"{"response":"  "}"#)]);
        assert!(matches!(
            model_at(host).generate("hi", 10),
            Err(GenerationError::EmptyResponse)
        ));
        server.join().unwrap();
    }

    #[test]
    fn generated_text_is_trimmed() {
        let (host, server) = serve(vec![(200, r#"{"response":"\n  Like a tiny lion.  "}"#)]);
        assert_eq!(model_at(host).generate("hi", 10).unwrap(), "Like a tiny lion.");
        server.join().unwrap();
    }

    #[test]
    fn failing_server_replies_fall_back_per_field() {
        let (host, server) = serve(vec![
            (500, r#"{"error":"out of memory"}"#),
            (200, r#"{"response":"  "}"#),
            (200, r#"{"response":"Cat at the center, pets around it."}"#),
        ]);
        let enricher = DefinitionEnricher::with_model(Box::new(model_at(host)), PromptConfig::default());
        let record = enricher.enrich("cat", "a pet");

        assert_eq!(record.simplified_definition.as_deref(), Some("Simplified: a pet"));
        assert_eq!(
            record.analogy.as_deref(),
            Some("Analogy for cat: Like a familiar example")
        );
        assert_eq!(
            record.mind_map_prompt.as_deref(),
            Some("Cat at the center, pets around it.")
        );
        assert_eq!(server.join().unwrap().len(), 3);
    }

    #[test]
    fn missing_model_is_pulled_when_allowed() {
        let (host, server) = serve(vec![
            (200, r#"{"models":[{"name":"mistral:latest"}]}"#),
            (200, r#"{"status":"success"}"#),
        ]);
        let config = ModelConfig {
            host,
            model: "llama3.2:1b".to_string(),
            pull_missing: true,
            ..ModelConfig::default()
        };
        let model = OllamaModel::connect(&config).unwrap();
        assert_eq!(model.name(), "llama3.2:1b");
        assert_eq!(
            server.join().unwrap(),
            vec!["GET /api/tags HTTP/1.1", "POST /api/pull HTTP/1.1"]
        );
    }

    #[test]
    fn missing_model_without_pull_is_not_installed() {
        let (host, server) = serve(vec![(200, r#"{"models":[]}"#)]);
        let config = ModelConfig {
            host,
            pull_missing: false,
            ..ModelConfig::default()
        };
        assert!(matches!(
            OllamaModel::connect(&config),
            Err(ModelError::NotInstalled { .. })
        ));
        server.join().unwrap();
    }

    #[test]
    fn closed_port_is_unreachable() {
        let config = ModelConfig {
            host: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            ..ModelConfig::default()
        };
        assert!(matches!(
            OllamaModel::connect(&config),
            Err(ModelError::Unreachable { .. })
        ));
    }
}
