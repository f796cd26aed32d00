//! Code samples for calling a documented endpoint.
//!
//! Snippets always carry the literal placeholder `YOUR_API_KEY`, never a
//! real key.

use std::collections::BTreeMap;

use reqwest::Url;

use crate::catalog::{EndpointDoc, KeyPlacement};

pub const KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    Python,
    Curl,
    Php,
    Go,
    Ruby,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::JavaScript,
        Language::Python,
        Language::Curl,
        Language::Php,
        Language::Go,
        Language::Ruby,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Curl => "cURL",
            Language::Php => "PHP",
            Language::Go => "Go",
            Language::Ruby => "Ruby",
        }
    }

    /// Get the next language (wrapping around)
    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Get the previous language (wrapping around)
    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Everything a snippet needs, resolved once.
struct Request {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    params: BTreeMap<String, String>,
}

impl Request {
    fn new(base_url: &str, endpoint: &EndpointDoc, key: KeyPlacement) -> Self {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        let mut params: BTreeMap<String, String> = endpoint
            .query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        match key {
            KeyPlacement::Header(name) => {
                headers.push((name.to_string(), KEY_PLACEHOLDER.to_string()))
            }
            KeyPlacement::Query(name) => {
                params.insert(name.to_string(), KEY_PLACEHOLDER.to_string());
            }
            KeyPlacement::Bearer => headers.push((
                "Authorization".to_string(),
                format!("Bearer {}", KEY_PLACEHOLDER),
            )),
        }

        Self {
            method: endpoint.method.to_uppercase(),
            url: format!("{}{}", base_url.trim_end_matches('/'), endpoint.example),
            headers,
            params,
        }
    }

    /// URL with the query string appended, for languages that take one string.
    fn full_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        match Url::parse(&self.url) {
            Ok(mut url) => {
                url.query_pairs_mut().extend_pairs(self.params.iter());
                url.to_string()
            }
            Err(_) => {
                let query: Vec<String> = self
                    .params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                format!("{}?{}", self.url, query.join("&"))
            }
        }
    }

    fn params_json(&self) -> String {
        serde_json::to_string_pretty(&self.params).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Render a sample request for `endpoint` in `lang`.
pub fn render(lang: Language, base_url: &str, endpoint: &EndpointDoc, key: KeyPlacement) -> String {
    let req = Request::new(base_url, endpoint, key);
    match lang {
        Language::JavaScript => javascript(&req),
        Language::Python => python(&req),
        Language::Curl => curl(&req),
        Language::Php => php(&req),
        Language::Go => go(&req),
        Language::Ruby => ruby(&req),
    }
}

fn javascript(req: &Request) -> String {
    let headers: Vec<String> = req
        .headers
        .iter()
        .map(|(k, v)| format!("    '{}': '{}'", k, v))
        .collect();
    let params = if req.params.is_empty() {
        String::new()
    } else {
        format!(",\n  params: {}", indent(&req.params_json(), "  "))
    };
    format!(
        "const axios = require('axios');\n\n\
         const config = {{\n  method: '{}',\n  url: '{}',\n  headers: {{\n{}\n  }}{}\n}};\n\n\
         axios(config)\n  .then(response => console.log(JSON.stringify(response.data)))\n  .catch(error => console.log(error));",
        req.method.to_lowercase(),
        req.url,
        headers.join(",\n"),
        params
    )
}

fn python(req: &Request) -> String {
    let headers: Vec<String> = req
        .headers
        .iter()
        .map(|(k, v)| format!("  '{}': '{}'", k, v))
        .collect();
    let (params_decl, params_arg) = if req.params.is_empty() {
        (String::new(), "")
    } else {
        (format!("\nparams = {}", req.params_json()), ", params=params")
    };
    format!(
        "import requests\n\nurl = '{}'\nheaders = {{\n{}\n}}{}\n\n\
         response = requests.{}(url, headers=headers{})\nprint(response.json())",
        req.url,
        headers.join(",\n"),
        params_decl,
        req.method.to_lowercase(),
        params_arg
    )
}

fn curl(req: &Request) -> String {
    let mut out = format!("curl -X {} '{}'", req.method, req.full_url());
    for (k, v) in &req.headers {
        out.push_str(&format!(" \\\n  -H '{}: {}'", k, v));
    }
    out
}

fn php(req: &Request) -> String {
    let headers: Vec<String> = req
        .headers
        .iter()
        .map(|(k, v)| format!("    '{}' => '{}'", k, v))
        .collect();
    let query = if req.params.is_empty() {
        String::new()
    } else {
        let pairs: Vec<String> = req
            .params
            .iter()
            .map(|(k, v)| format!("    '{}' => '{}'", k, v))
            .collect();
        format!(",\n  'query' => [\n{}\n  ]", pairs.join(",\n"))
    };
    format!(
        "<?php\nrequire 'vendor/autoload.php';\n\n$client = new \\GuzzleHttp\\Client();\n\n\
         $response = $client->request('{}', '{}', [\n  'headers' => [\n{}\n  ]{}\n]);\n\n\
         echo $response->getBody();",
        req.method,
        req.url,
        headers.join(",\n"),
        query
    )
}

fn go(req: &Request) -> String {
    let headers: Vec<String> = req
        .headers
        .iter()
        .map(|(k, v)| format!("\treq.Header.Add(\"{}\", \"{}\")", k, v))
        .collect();
    format!(
        "package main\n\nimport (\n\t\"fmt\"\n\t\"io\"\n\t\"net/http\"\n)\n\n\
         func main() {{\n\treq, _ := http.NewRequest(\"{}\", \"{}\", nil)\n{}\n\n\
         \tres, _ := http.DefaultClient.Do(req)\n\tdefer res.Body.Close()\n\
         \tbody, _ := io.ReadAll(res.Body)\n\tfmt.Println(string(body))\n}}",
        req.method,
        req.full_url(),
        headers.join("\n")
    )
}

fn ruby(req: &Request) -> String {
    let headers: Vec<String> = req
        .headers
        .iter()
        .map(|(k, v)| format!("request['{}'] = '{}'", k, v))
        .collect();
    let query = if req.params.is_empty() {
        String::new()
    } else {
        let pairs: Vec<String> = req
            .params
            .iter()
            .map(|(k, v)| format!("'{}' => '{}'", k, v))
            .collect();
        format!("uri.query = URI.encode_www_form({{ {} }})\n", pairs.join(", "))
    };
    let class = match req.method.as_str() {
        "POST" => "Post",
        "PUT" => "Put",
        "DELETE" => "Delete",
        _ => "Get",
    };
    format!(
        "require 'net/http'\nrequire 'json'\n\nuri = URI('{}')\n{}\n\
         http = Net::HTTP.new(uri.host, uri.port)\nhttp.use_ssl = true\n\n\
         request = Net::HTTP::{}.new(uri)\n{}\n\nresponse = http.request(request)\nputs response.read_body",
        req.url,
        query,
        class,
        headers.join("\n")
    )
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| if i == 0 { line.to_string() } else { format!("{}{}", prefix, line) })
        .collect::<Vec<_>>()
        .join("\n")
}
