use elasticemail::header::{HeaderName, HeaderValue, USER_AGENT};
use elasticemail::{
    CallOptions, CancelToken, Client, Config, Email, Error, HttpRequest, Method, ParamMap,
    RawResponse, Response, StatusCode, SubAccountRef, Subaccount, Transport,
};
use std::sync::{Arc, Mutex};
use std::thread;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

type Recorded = Arc<Mutex<Vec<HttpRequest>>>;

/// Records every request and answers with a fixed reply
struct FakeTransport {
    requests: Recorded,
    content_type: &'static str,
    body: &'static str,
}

impl Transport for FakeTransport {
    fn execute(&self, request: HttpRequest, _: Option<&CancelToken>) -> elasticemail::Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(RawResponse::from_bytes(StatusCode::OK, self.content_type, self.body))
    }
}

fn fake_client(content_type: &'static str, body: &'static str) -> (Client, Recorded) {
    init_tracing();
    let requests = Recorded::default();
    let transport = FakeTransport {
        requests: requests.clone(),
        content_type,
        body,
    };
    let client = Client::with_transport(Config::new("default-key"), transport).unwrap();
    (client, requests)
}

fn query_pairs(req: &HttpRequest) -> ParamMap {
    req.url.query_pairs().into_owned().collect()
}

fn body_pairs(req: &HttpRequest) -> ParamMap {
    url::form_urlencoded::parse(req.body.as_deref().unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

#[test]
fn test_send_posts_form_body() {
    let (client, requests) = fake_client(
        "application/json; charset=utf-8",
        r#"{"success":true,"data":{"transactionid":"t-1","messageid":"m-1"}}"#,
    );

    let email = Email {
        from: "me@example.com".to_string(),
        to: "you@example.com".to_string(),
        subject: "Hello there".to_string(),
        ..Default::default()
    };
    let response = client.send(&email);

    assert!(response.is_success(), "{:?}", response.error());
    assert_eq!(response.get_string("messageid"), Some("m-1".to_string()));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.url.as_str(), "https://api.elasticemail.com/v2/email/send");
    assert_eq!(req.url.query(), None);

    let body = body_pairs(req);
    assert_eq!(body["apikey"], "default-key");
    assert_eq!(body["subject"], "Hello there");
    assert!(!body.contains_key("bodyHtml"));
}

#[test]
fn test_status_uses_query_string() {
    let (client, requests) = fake_client("application/json", r#"{"success":true,"data":{"status":"Sent"}}"#);

    let response = client.status("msg-42");
    assert_eq!(response.get_string("status"), Some("Sent".to_string()));

    let req = &requests.lock().unwrap()[0];
    assert_eq!(req.method, Method::GET);
    assert!(req.body.is_none());
    assert_eq!(req.url.path(), "/v2/email/status");
    let query = query_pairs(req);
    assert_eq!(query["messageID"], "msg-42");
    assert_eq!(query["apikey"], "default-key");
}

#[test]
fn test_add_subaccount_returns_key() {
    let (client, requests) = fake_client("application/json", r#"{"success":true,"data":"ABC123"}"#);

    let sub = Subaccount {
        email: "sub@example.com".to_string(),
        password: "hunter22".to_string(),
        ..Default::default()
    };
    let response = client.add_subaccount(&sub);

    assert!(response.is_success());
    assert_eq!(response.data_str(), Some("ABC123"));
    assert!(response.error().is_none());

    let query = query_pairs(&requests.lock().unwrap()[0]);
    assert_eq!(query["confirmPassword"], "hunter22");
    assert_eq!(query["maxContacts"], "0");
}

#[test]
fn test_update_settings_overrides_win() {
    let (client, requests) = fake_client("application/json", r#"{"success":true}"#);

    let sub = Subaccount {
        pool_name: "structured".to_string(),
        ..Default::default()
    };
    let overrides = ParamMap::from([
        ("poolName".to_string(), "raw".to_string()),
        ("subAccountEmail".to_string(), "other@example.com".to_string()),
    ]);
    let target = SubAccountRef::Email("sub@example.com".to_string());
    let response = client.update_subaccount_settings(&target, &sub, &overrides);
    assert!(response.is_success());

    let query = query_pairs(&requests.lock().unwrap()[0]);
    assert_eq!(query["poolName"], "raw");
    assert_eq!(query["subAccountEmail"], "other@example.com");
    assert_eq!(query["email"], "");
}

#[test]
fn test_delete_and_key_lookup_use_ref() {
    let (client, requests) = fake_client("application/json", r#"{"success":true,"data":"KEY"}"#);

    let target = SubAccountRef::PublicAccountId("pub-1".to_string());
    assert!(client.delete_subaccount(&target).is_success());
    assert_eq!(client.get_subaccount_api_key(&target).data_str(), Some("KEY"));

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].url.path(), "/v2/account/deletesubaccount");
    assert_eq!(requests[1].url.path(), "/v2/account/getsubaccountapikey");
    assert_eq!(query_pairs(&requests[1])["publicAccountID"], "pub-1");
}

#[test]
fn test_api_error_reported() {
    let (client, _) = fake_client("application/json", r#"{"success":false,"error":"duplicate email"}"#);

    let response = client.add_subaccount(&Subaccount::default());
    assert!(!response.is_success());
    assert!(response.data().is_none());
    assert_eq!(response.error().and_then(Error::api_message), Some("duplicate email"));
    assert!(response.body().is_some());
}

#[test]
fn test_html_reply_is_content_type_error() {
    let (client, _) = fake_client("text/html", r#"{"success":true,"data":"x"}"#);
    let response = client.view("m-1");
    assert!(matches!(response.error(), Some(Error::ContentType { .. })));
}

#[test]
fn test_token_precedence_through_pipeline() {
    for mask in 0..8u8 {
        let (client, requests) = fake_client("application/json", r#"{"success":true}"#);

        let mut params = ParamMap::new();
        if mask & 1 != 0 {
            params.insert("apikey".to_string(), "explicit".to_string());
        }
        let mut opts = CallOptions::new();
        if mask & 2 != 0 {
            opts = opts.with_api_key("override");
        }
        let client = if mask & 4 != 0 {
            client
        } else {
            let transport = FakeTransport {
                requests: requests.clone(),
                content_type: "application/json",
                body: r#"{"success":true}"#,
            };
            Client::with_transport(Config::new(""), transport).unwrap()
        };

        let expected = match mask {
            m if m & 1 != 0 => "explicit",
            m if m & 2 != 0 => "override",
            m if m & 4 != 0 => "default-key",
            _ => "",
        };

        client.get("email/view", params, &opts);
        let query = query_pairs(&requests.lock().unwrap()[0]);
        assert_eq!(query["apikey"], expected, "mask {:03b}", mask);
    }
}

#[test]
fn test_cancel_before_dispatch_sends_nothing() {
    let (client, requests) = fake_client("application/json", r#"{"success":true}"#);

    let token = CancelToken::new();
    token.cancel();
    let response = client.send_with(&Email::default(), &CallOptions::new().with_cancel(token));

    assert!(response.error().is_some_and(Error::is_cancelled));
    assert!(response.body().is_none());
    assert!(requests.lock().unwrap().is_empty());
}

#[test]
fn test_build_error_sends_nothing() {
    let (client, requests) = fake_client("application/json", r#"{"success":true}"#);
    let response = client.request(Method::PUT, "email/send", (), &CallOptions::new());
    assert!(matches!(response.error(), Some(Error::Build { .. })));
    assert!(requests.lock().unwrap().is_empty());
}

#[test]
fn test_context_headers_do_not_leak() {
    let (mut client, requests) = fake_client("application/json", r#"{"success":true}"#);
    let team = HeaderName::from_static("x-team");
    client.headers_mut().insert(team.clone(), HeaderValue::from_static("mail"));

    let opts = CallOptions::new()
        .with_header(team.clone(), HeaderValue::from_static("billing"))
        .without_header(USER_AGENT);
    client.view_with("m-1", &opts);
    client.view("m-2");

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].headers[&team], "billing");
    assert!(requests[0].headers.get(USER_AGENT).is_none());
    assert_eq!(requests[1].headers[&team], "mail");
    assert!(requests[1].headers.get(USER_AGENT).is_some());
}

#[test]
fn test_shared_client_concurrent_calls() {
    let (client, requests) = fake_client("application/json", r#"{"success":true}"#);
    let client = Arc::new(client);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                let opts = CallOptions::new().with_api_key(format!("key-{}", i));
                let response: Response = client.status_with(&format!("m-{}", i), &opts);
                assert!(response.is_success());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 8);
    for req in requests.iter() {
        let query = query_pairs(req);
        let n = query["messageID"].trim_start_matches("m-");
        assert_eq!(query["apikey"], format!("key-{}", n));
    }
}

#[test]
#[ignore] // Run with: ELASTICEMAIL_API_KEY=... cargo test --test integration_tests -- --ignored
fn test_live_status_unknown_message() {
    let api_key = std::env::var("ELASTICEMAIL_API_KEY").expect("ELASTICEMAIL_API_KEY not set");
    let client = Client::new(Config::new(api_key)).unwrap();

    let response = client.status("does-not-exist");

    // The API answers with an envelope either way
    assert!(response.body().is_some());
    println!("Live status response: {:?}", response.error());
}
