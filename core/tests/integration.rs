//! End-to-end lookups against the mock EBI Search server.
//!
//! # Design
//! Each test starts the mock server on a random port, then drives
//! `RnaCentralDictionary` over real HTTP through a ureq-backed `Transport`.
//! Validates that URL building and response mapping agree with the server's
//! view of the API.

use std::net::SocketAddr;

use rnacentral_core::{
    ApiError, Dictionary, DictionaryConfig, EntryOptions, HttpRequest, HttpResponse, MatchOptions,
    MatchType, RnaCentralClient, RnaCentralDictionary, Transport, ZSelector,
};

/// Executes requests with ureq, returning 4xx/5xx responses as data.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut call = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            call = call.header(name.as_str(), value.as_str());
        }
        let mut response = call.call().map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_ebisearch::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}{}", mock_ebisearch::BASE_PATH)
}

fn dictionary(config: DictionaryConfig) -> RnaCentralDictionary<UreqTransport> {
    RnaCentralDictionary::new(RnaCentralClient::new(config), UreqTransport::new())
}

fn ids<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    items
        .into_iter()
        .map(|id| id.trim_start_matches("https://www.rnacentral.org/rna/").to_string())
        .collect()
}

#[test]
fn entries_by_id_are_sorted_and_pruned() {
    let addr = start_server();
    let dict = dictionary(DictionaryConfig::with_base_url(&base_url(addr)));

    let options = EntryOptions {
        sort: Some("str".to_string()),
        page: Some(1),
        per_page: Some(5),
        ..EntryOptions::with_ids([
            "https://www.rnacentral.org/rna/URS0000301B08_9606",
            "https://www.rnacentral.org/rna/URS0000DDDDBA_720",
            "https://www.rnacentral.org/rna/URS0000772E1D_1458438",
            "URS0000A8C125_9606",
        ])
    };
    let result = dict.get_entries(&options).unwrap();
    assert_eq!(
        ids(result.items.iter().map(|e| e.id.as_str())),
        vec![
            "URS0000DDDDBA_720",
            "URS0000A8C125_9606",
            "URS0000301B08_9606",
            "URS0000772E1D_1458438",
        ]
    );

    let tmrna = &result.items[0];
    assert_eq!(tmrna.main_term(), "Actinobacillus pleuropneumoniae tmRNA");
    assert_eq!(tmrna.z.as_ref().unwrap().obsolete, Some(true));

    let unknown_state = result.items[3].z.as_ref().unwrap();
    assert_eq!(unknown_state.obsolete, None);
    assert_eq!(unknown_state.rna_type.as_deref(), Some("rRNA"));
    assert_eq!(unknown_state.databases, None);

    let pruned = dict
        .get_entries(&EntryOptions {
            z: ZSelector::only(["databases"]),
            ..EntryOptions::with_ids(["URS0000772E1D_1458438", "URS0000301B08_9606"])
        })
        .unwrap();
    assert_eq!(
        ids(pruned.items.iter().map(|e| e.id.as_str())),
        vec!["URS0000301B08_9606", "URS0000772E1D_1458438"]
    );
    assert_eq!(
        pruned.items[0].z.as_ref().unwrap().databases.as_deref().unwrap().len(),
        4
    );
    assert!(pruned.items[1].z.is_none());
}

#[test]
fn requested_id_unknown_to_service_is_omitted() {
    let addr = start_server();
    let dict = dictionary(DictionaryConfig::with_base_url(&base_url(addr)));

    let result = dict
        .get_entries(&EntryOptions::with_ids(["URS_DOES_NOT_EXIST", "URS0000BD2F89_9606"]))
        .unwrap();
    assert_eq!(
        ids(result.items.iter().map(|e| e.id.as_str())),
        vec!["URS0000BD2F89_9606"]
    );
}

#[test]
fn browse_all_is_paged_by_the_service() {
    let addr = start_server();
    let dict = dictionary(DictionaryConfig::with_base_url(&base_url(addr)));

    let options = EntryOptions {
        page: Some(2),
        per_page: Some(2),
        ..EntryOptions::default()
    };
    let result = dict.get_entries(&options).unwrap();
    assert_eq!(
        ids(result.items.iter().map(|e| e.id.as_str())),
        vec!["URS0000A8C125_9606", "URS0000BD2F89_9606"]
    );
}

#[test]
fn text_matches_are_classified() {
    let addr = start_server();
    let dict = dictionary(DictionaryConfig::with_base_url(&base_url(addr)));

    let melanoma = dict
        .get_matches_for_text("melanoma", &MatchOptions::default())
        .unwrap();
    assert_eq!(melanoma.items.len(), 1);
    assert_eq!(melanoma.items[0].str, "Unique RNA Sequence URS0000BD2F89_9606");
    assert_eq!(melanoma.items[0].match_type, MatchType::Other);

    let tp53 = dict.get_matches_for_text("TP53", &MatchOptions::default()).unwrap();
    assert_eq!(tp53.items.len(), 1);
    assert_eq!(tp53.items[0].str, "TP53TG1");
    assert_eq!(tp53.items[0].match_type, MatchType::StartsWith);

    let boolean = dict
        .get_matches_for_text("hotair and not melanoma", &MatchOptions::default())
        .unwrap();
    assert_eq!(
        ids(boolean.items.iter().map(|m| m.id.as_str())),
        vec!["URS0000301B08_9606"]
    );

    let blank = dict.get_matches_for_text("   ", &MatchOptions::default()).unwrap();
    assert!(blank.items.is_empty());
}

#[test]
fn service_rejection_surfaces_its_payload() {
    let addr = start_server();
    let config = DictionaryConfig {
        max_page_size: 500,
        ..DictionaryConfig::with_base_url(&base_url(addr))
    };
    let dict = dictionary(config);

    let options = MatchOptions {
        per_page: Some(200),
        ..MatchOptions::default()
    };
    let err = dict.get_matches_for_text("melanoma", &options).unwrap_err();
    match err {
        ApiError::Service { status, payload } => {
            assert_eq!(status, 400);
            assert!(payload["errorMessage"].as_str().unwrap().contains("size"));
        }
        other => panic!("expected Service, got {other:?}"),
    }
}

#[test]
fn unreachable_service_is_a_transport_error() {
    // bind then drop to get a port nobody listens on
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let dict = dictionary(DictionaryConfig::with_base_url(&base_url(addr)));

    let err = dict.get_entries(&EntryOptions::default()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
