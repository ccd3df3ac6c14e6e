use std::fs;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mount_history(mock_server: &MockServer, mock_response: &str) {
        Mock::given(method("POST"))
            .and(path("/data/etf/detail_hists/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(mock_server)
            .await;
    }

    pub async fn mount_etf_list(mock_server: &MockServer, mock_response: &str) {
        Mock::given(method("GET"))
            .and(path("/data/etf/etf_list/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(mock_server)
            .await;
    }

    pub fn write_config(
        base_url: &str,
        data_dir: &std::path::Path,
        market_close_hour: u32,
    ) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
funds:
  - code: "510500"
    name: "ETF500"
provider:
  base_url: {}
data_dir: {}
market_close_hour: {}
"#,
            base_url,
            data_dir.display(),
            market_close_hour
        );
        std::fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_update_flow_persists_merged_history() {
    let mock_server = wiremock::MockServer::start().await;
    let mock_response = r#"{
        "rows": [
            {"cell": {"hist_dt": "2021-01-05", "trade_price": "2.5", "amount": "120.5"}},
            {"cell": {"hist_dt": "2021-01-04", "trade_price": "2.4", "amount": "118"}}
        ]
    }"#;
    test_utils::mount_history(&mock_server, mock_response).await;

    let data_dir = tempfile::tempdir().expect("Failed to create data dir");
    // Close hour 0 keeps the run off the intraday endpoint.
    let config_file = test_utils::write_config(&mock_server.uri(), data_dir.path(), 0);

    let result = etfshare::run_command(
        etfshare::AppCommand::Update,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Update failed with: {:?}", result.err());

    // Persisted oldest first, one CSV line per observation.
    let record = data_dir.path().join("510500.txt");
    let contents = fs::read_to_string(&record).expect("History file missing");
    assert_eq!(contents, "2021-01-04,2.4,118\n2021-01-05,2.5,120.5\n");

    // A second run against the same remote data changes nothing.
    let result = etfshare::run_command(
        etfshare::AppCommand::Update,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Re-run failed with: {:?}", result.err());
    assert_eq!(fs::read_to_string(&record).unwrap(), contents);
}

#[test_log::test(tokio::test)]
async fn test_full_update_flow_appends_intraday_quote() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_history(
        &mock_server,
        r#"{
            "rows": [
                {"cell": {"hist_dt": "2021-01-04", "trade_price": "2.4", "amount": "118"}}
            ]
        }"#,
    )
    .await;
    test_utils::mount_etf_list(
        &mock_server,
        r#"{
            "rows": [
                {"cell": {"fund_id": "510500", "price": "2.6", "amount": "121"}},
                {"cell": {"fund_id": "999999", "price": "1.0", "amount": "1"}}
            ]
        }"#,
    )
    .await;

    let data_dir = tempfile::tempdir().expect("Failed to create data dir");
    // Close hour 24 keeps the market "open" no matter when the test runs.
    let config_file = test_utils::write_config(&mock_server.uri(), data_dir.path(), 24);

    let result = etfshare::run_command(
        etfshare::AppCommand::Update,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Update failed with: {:?}", result.err());

    let contents = fs::read_to_string(data_dir.path().join("510500.txt")).unwrap();
    let today = chrono::Local::now().date_naive();
    assert_eq!(
        contents,
        format!("2021-01-04,2.4,118\n{today},2.6,121\n")
    );
}

#[test_log::test(tokio::test)]
async fn test_update_survives_unreachable_remote() {
    let data_dir = tempfile::tempdir().expect("Failed to create data dir");

    // Seed local history, then point the app at a dead endpoint.
    let store = etfshare::store::SeriesStore::new(data_dir.path());
    let series = etfshare::core::series::Series::from_observations(vec![
        etfshare::core::series::Observation::new(
            chrono::NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
            2.4,
            118.0,
        ),
    ]);
    store.save("510500", &series).expect("Seed save failed");

    let config_file = test_utils::write_config("http://127.0.0.1:9", data_dir.path(), 0);

    let result = etfshare::run_command(
        etfshare::AppCommand::Update,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Update failed with: {:?}", result.err());

    // Local history is untouched by the failed fetch.
    let contents = fs::read_to_string(data_dir.path().join("510500.txt")).unwrap();
    assert_eq!(contents, "2021-01-04,2.4,118\n");
}

#[test_log::test(tokio::test)]
async fn test_show_flow_reads_without_network() {
    let data_dir = tempfile::tempdir().expect("Failed to create data dir");
    fs::create_dir_all(data_dir.path()).unwrap();
    fs::write(
        data_dir.path().join("510500.txt"),
        "2021-01-04,2.4,118\n2021-01-05,2.5,120.5\n",
    )
    .unwrap();

    // Dead base URL proves show never fetches.
    let config_file = test_utils::write_config("http://127.0.0.1:9", data_dir.path(), 0);

    let result = etfshare::run_command(
        etfshare::AppCommand::Show,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Show failed with: {:?}", result.err());
}
