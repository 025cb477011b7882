use hemmer_provider_radarr::plugin::testing::ProviderTester;
use hemmer_provider_radarr::{ProviderError, RadarrProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

async fn configured_tester(server: &MockServer) -> ProviderTester<RadarrProvider> {
    let tester = ProviderTester::new(RadarrProvider::new());
    tester
        .configure(json!({"url": server.uri(), "api_key": API_KEY}))
        .await
        .unwrap();
    tester
}

// ── Variant lifecycle ───────────────────────────────────────────

#[tokio::test]
async fn aria2_create_round_trips_and_keeps_secret() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/downloadclient"))
        .and(header("X-Api-Key", API_KEY))
        .and(body_partial_json(json!({
            "implementation": "Aria2",
            "configContract": "Aria2Settings",
            "protocol": "torrent"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "name": "aria2",
            "implementation": "Aria2",
            "configContract": "Aria2Settings",
            "protocol": "torrent",
            "enable": true,
            "priority": 1,
            "tags": [],
            "fields": [
                {"name": "host", "value": "aria2.local"},
                {"name": "port", "value": 6800},
                {"name": "rpcPath", "value": "/rpc"},
                {"name": "useSsl", "value": false},
                {"name": "secretToken", "value": "********"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .create(
            "radarr_download_client_aria2",
            json!({
                "name": "aria2",
                "implementation": "Aria2",
                "config_contract": "Aria2Settings",
                "protocol": "torrent",
                "enable": true,
                "priority": 1,
                "host": "aria2.local",
                "port": 6800,
                "rpc_path": "/rpc",
                "use_ssl": false,
                "secret_token": "s3cret"
            }),
        )
        .await
        .unwrap();

    assert_eq!(state["id"], json!(12));
    assert_eq!(state["host"], json!("aria2.local"));
    assert_eq!(state["port"], json!(6800));
    // the server masked the token; the planned value must survive
    assert_eq!(state["secret_token"], json!("s3cret"));
    assert_eq!(state["tags"], json!([]));
}

#[tokio::test]
async fn read_promotes_prior_secret_over_mask() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/downloadclient/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "name": "deluge",
            "implementation": "Deluge",
            "configContract": "DelugeSettings",
            "protocol": "torrent",
            "tags": [3],
            "fields": [
                {"name": "host", "value": "deluge.local"},
                {"name": "password", "value": "********"}
            ]
        })))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .read(
            "radarr_download_client_deluge",
            json!({"id": 5, "name": "deluge", "host": "deluge.local", "password": "hunter2"}),
        )
        .await
        .unwrap();

    assert_eq!(state["password"], json!("hunter2"));
    assert_eq!(state["tags"], json!([3]));
}

#[tokio::test]
async fn read_gone_resource_returns_null_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/indexer/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .read("radarr_indexer_newznab", json!({"id": 9, "name": "nzb"}))
        .await
        .unwrap();
    assert!(state.is_null());
}

#[tokio::test]
async fn decode_tolerates_unknown_fields_and_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/notification/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "name": "kodi",
            "implementation": "Xbmc",
            "configContract": "XbmcSettings",
            "onGrab": true,
            "onMovieAdded": true,
            "tags": [],
            "fields": [
                {"name": "host", "value": "kodi.local"},
                {"name": "displayTime", "value": "5"},
                {"name": "wolBroadcastAddress", "value": "10.0.0.255"}
            ]
        })))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .read("radarr_notification_kodi", json!({"id": 2, "name": "kodi"}))
        .await
        .unwrap();

    // the unknown flag and field are dropped, the stringified int coerced
    assert_eq!(state["display_time"], json!(5));
    assert_eq!(state["host"], json!("kodi.local"));
    assert!(state.get("wol_broadcast_address").is_none());
    assert!(state.get("on_movie_added").is_none());
}

#[tokio::test]
async fn read_surfaces_decode_mismatch_as_diagnostics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/downloadclient/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "name": "deluge",
            "implementation": "Deluge",
            "configContract": "DelugeSettings",
            "priority": "high",
            "tags": [],
            "fields": [{"name": "host", "value": "deluge.local"}]
        })))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let (state, diagnostics) = tester
        .read_with_diagnostics(
            "radarr_download_client_deluge",
            json!({"id": 4, "name": "deluge"}),
        )
        .await
        .unwrap();

    // the mistyped flag is reported, the rest of the record still decodes
    assert_eq!(state["host"], json!("deluge.local"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].attribute.as_deref(), Some("priority"));
}

#[tokio::test]
async fn update_puts_to_the_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v3/downloadclient/12"))
        .and(body_partial_json(json!({"id": 12, "name": "aria2"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": 12,
            "name": "aria2",
            "implementation": "Aria2",
            "configContract": "Aria2Settings",
            "tags": [],
            "fields": [{"name": "host", "value": "new.local"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .update(
            "radarr_download_client_aria2",
            json!({"id": 12, "name": "aria2", "host": "aria2.local"}),
            json!({"id": 12, "name": "aria2", "host": "new.local"}),
        )
        .await
        .unwrap();
    assert_eq!(state["host"], json!("new.local"));
}

#[tokio::test]
async fn delete_tolerates_already_gone() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/downloadclient/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    tester
        .delete("radarr_download_client_aria2", json!({"id": 7}))
        .await
        .unwrap();
}

// ── Custom formats ──────────────────────────────────────────────

#[tokio::test]
async fn custom_format_create_round_trips_specifications() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/customformat"))
        .and(body_partial_json(json!({
            "name": "Remux",
            "specifications": [
                {"name": "release", "implementation": "ReleaseTitleSpecification"}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3,
            "name": "Remux",
            "includeCustomFormatWhenRenaming": true,
            "specifications": [{
                "name": "release",
                "implementation": "ReleaseTitleSpecification",
                "configContract": "ReleaseTitleSpecification",
                "negate": false,
                "required": true,
                "fields": [{"name": "value", "value": "\\bRemux\\b"}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .create(
            "radarr_custom_format",
            json!({
                "name": "Remux",
                "include_custom_format_when_renaming": true,
                "specification": [{
                    "name": "release",
                    "implementation": "ReleaseTitleSpecification",
                    "negate": false,
                    "required": true,
                    "value": "\\bRemux\\b"
                }]
            }),
        )
        .await
        .unwrap();

    assert_eq!(state["id"], json!(3));
    let blocks = state["specification"].as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["value"], json!("\\bRemux\\b"));
    assert_eq!(blocks[0]["required"], json!(true));
}

// ── Singletons ──────────────────────────────────────────────────

#[tokio::test]
async fn naming_config_is_put_with_pinned_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v3/config/naming"))
        .and(body_partial_json(json!({"id": 1, "renameMovies": true})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": 1,
            "renameMovies": true,
            "replaceIllegalCharacters": false,
            "colonReplacementFormat": 2,
            "standardMovieFormat": "{Movie Title} ({Release Year})"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .create("radarr_naming", json!({"rename_movies": true}))
        .await
        .unwrap();

    assert_eq!(state["id"], json!(1));
    assert_eq!(state["rename_movies"], json!(true));
    assert_eq!(
        state["standard_movie_format"],
        json!("{Movie Title} ({Release Year})")
    );
}

#[tokio::test]
async fn singleton_delete_never_calls_the_server() {
    // no mocks mounted: any request would 404 and fail a real call path
    let server = MockServer::start().await;
    let tester = configured_tester(&server).await;
    tester
        .delete("radarr_host", json!({"id": 1, "port": 7878}))
        .await
        .unwrap();
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Tags and import ─────────────────────────────────────────────

#[tokio::test]
async fn tag_import_by_numeric_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/tag/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "label": "4k"})),
        )
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let imported = tester.import_resource("radarr_tag", "7").await.unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].state, json!({"id": 7, "label": "4k"}));
}

#[tokio::test]
async fn host_import_accepts_any_identifier_and_pins_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/config/host"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "bindAddress": "*",
            "port": 7878,
            "launchBrowser": false
        })))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    // singleton import ids carry no information; any string works
    let imported = tester
        .import_resource("radarr_host", "whatever")
        .await
        .unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].state["id"], json!(1));
    assert_eq!(imported[0].state["port"], json!(7878));
    assert_eq!(imported[0].state["bind_address"], json!("*"));
}

#[tokio::test]
async fn import_rejects_non_numeric_identifier() {
    let server = MockServer::start().await;
    let tester = configured_tester(&server).await;
    let err = tester
        .import_resource("radarr_tag", "my-tag")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::ImportIdentifier(_)));
}

// ── Data sources ────────────────────────────────────────────────

#[tokio::test]
async fn indexer_data_source_finds_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/indexer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1, "name": "other", "implementation": "Torznab",
                "configContract": "TorznabSettings", "tags": [], "fields": []
            },
            {
                "id": 2, "name": "nzb.su", "implementation": "Newznab",
                "configContract": "NewznabSettings", "protocol": "usenet",
                "enableRss": true, "priority": 25, "tags": [1],
                "fields": [
                    {"name": "baseUrl", "value": "https://api.nzb.su"},
                    {"name": "categories", "value": [2000, 2010]}
                ]
            }
        ])))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let state = tester
        .read_data_source("radarr_indexer", json!({"name": "nzb.su"}))
        .await
        .unwrap();

    assert_eq!(state["id"], json!(2));
    assert_eq!(state["base_url"], json!("https://api.nzb.su"));
    assert_eq!(state["categories"], json!([2000, 2010]));
    assert_eq!(state["enable_rss"], json!(true));
}

#[tokio::test]
async fn tag_data_source_misses_with_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/tag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "label": "hd"}])))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let err = tester
        .read_data_source("radarr_tag", json!({"label": "missing"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(_)));
}
