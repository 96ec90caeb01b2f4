use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_ebisearch::{app, SearchResult, BASE_PATH};
use tower::ServiceExt;

const FIELDS: &str = "id%2Cname%2Cdescription%2Cgene%2Cgene_synonym%2Cactive%2Cexpert_db%2Crna_type%2Cspecies";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn ids(result: &SearchResult) -> Vec<&str> {
    result.entries.iter().map(|r| r.id.as_str()).collect()
}

// --- browse ---

#[tokio::test]
async fn browse_all_pages_through_records() {
    let resp = app()
        .oneshot(get(&format!(
            "{BASE_PATH}?query=domain_source:rnacentral&fields={FIELDS}&size=2&start=1&format=json"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: SearchResult = body_json(resp).await;
    assert_eq!(result.hit_count, 5);
    assert_eq!(ids(&result), vec!["URS0000772E1D_1458438", "URS0000A8C125_9606"]);
}

#[tokio::test]
async fn oversized_page_is_rejected_with_json_error() {
    let resp = app()
        .oneshot(get(&format!(
            "{BASE_PATH}?query=domain_source:rnacentral&size=101&start=0&format=json"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let payload: serde_json::Value = body_json(resp).await;
    assert!(payload["errorMessage"].as_str().unwrap().contains("size"));
}

#[tokio::test]
async fn start_at_ceiling_is_rejected() {
    let resp = app()
        .oneshot(get(&format!(
            "{BASE_PATH}?query=domain_source:rnacentral&size=10&start=1000000&format=json"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_query_is_rejected() {
    let resp = app().oneshot(get(BASE_PATH)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!body_bytes(resp).await.is_empty());
}

// --- text search ---

#[tokio::test]
async fn wildcard_search_matches_description_words() {
    let resp = app()
        .oneshot(get(&format!(
            "{BASE_PATH}?query=melanoma%2A&fields={FIELDS}&size=50&start=0&format=json"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: SearchResult = body_json(resp).await;
    assert_eq!(ids(&result), vec!["URS0000BD2F89_9606"]);
    assert_eq!(result.entries[0].fields.len(), 9);
}

#[tokio::test]
async fn unsupported_format_is_rejected() {
    let resp = app()
        .oneshot(get(&format!("{BASE_PATH}?query=hotair&format=xml")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- entry lookup ---

#[tokio::test]
async fn entry_lookup_returns_known_ids_in_request_order() {
    let resp = app()
        .oneshot(get(&format!(
            "{BASE_PATH}/entry/URS0000DDDDBA_720,URS_UNKNOWN,URS0000301B08_9606?fields={FIELDS}&format=json"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: SearchResult = body_json(resp).await;
    assert_eq!(ids(&result), vec!["URS0000DDDDBA_720", "URS0000301B08_9606"]);
    assert_eq!(result.entries[0].fields["active"], vec!["Obsolete".to_string()]);
}

#[tokio::test]
async fn entry_lookup_without_fields_returns_bare_records() {
    let resp = app()
        .oneshot(get(&format!("{BASE_PATH}/entry/URS0000301B08_9606")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: SearchResult = body_json(resp).await;
    assert_eq!(result.entries.len(), 1);
    assert!(result.entries[0].fields.is_empty());
}
