//! CSV in, layered KMZ out, against mock map and geocoding servers.

use placemark::cli::convert_cmd::convert_csv;
use placemark::config::Settings;
use placemark::document::OutputFormat;
use placemark::{Pipeline, PipelineOptions};
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOTEL_PAGE: &str = r#"<html><script>
window.APP_STATE = {"featureTypeDescription":"Hotel","latitude":48.8566,"longitude":2.3522};
</script></html>"#;

async fn mock_maps(server: &MockServer) {
    let landing = format!("{}/maps/place/Grand+Hotel/data", server.uri());
    Mock::given(method("GET"))
        .and(path("/maps/place/Grand+Hotel"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", landing.as_str()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maps/place/Grand+Hotel/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOTEL_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"display_name": "1 Rue de Test, Paris"})),
        )
        .expect(2)
        .mount(server)
        .await;
}

fn read_kmz(path: &Path) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 1);
    let mut doc = archive.by_name("doc.kml").unwrap();
    let mut kml = String::new();
    doc.read_to_string(&mut kml).unwrap();
    kml
}

#[tokio::test]
async fn test_csv_to_layered_kmz_with_geocoding() {
    let server = MockServer::start().await;
    mock_maps(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("paris.csv");
    let csv = format!(
        "\u{feff}Title,Note,URL,Latitude,Longitude,Phone\n\
         Eiffel Tower,Go at sunset,,48.8584,2.2945,\n\
         Grand Hotel,,{}/maps/place/Grand+Hotel,,,+33 1 23 45 67 89\n\
         Mystery,,,,,\n",
        server.uri()
    );
    std::fs::write(&input, csv).unwrap();

    let settings = Settings {
        geocode_url: url::Url::parse(&format!("{}/reverse", server.uri())).unwrap(),
        http_timeout: Duration::from_secs(5),
        backoff_base: Duration::from_millis(1),
        ..Settings::default()
    };
    let options = PipelineOptions {
        geocode: true,
        layers: true,
        icons: true,
    };
    let mut pipeline = Pipeline::from_settings(&settings, options).unwrap();

    let output = dir.path().join("out").join("paris.kmz");
    let report = convert_csv(&mut pipeline, &input, &output, OutputFormat::Kmz)
        .await
        .unwrap();

    assert_eq!(report.placed, 2);
    assert_eq!(report.failed, 1);

    let kml = read_kmz(&output);
    assert!(kml.contains("<name>Sleep</name>"));
    assert!(kml.contains("<name>Do</name>"));
    assert!(!kml.contains("<name>Eat</name>"));
    assert!(kml.contains("<coordinates>2.3522,48.8566,0</coordinates>"));
    assert!(kml.contains("<coordinates>2.2945,48.8584,0</coordinates>"));
    assert!(kml.contains("1 Rue de Test, Paris"));
    assert!(kml.contains("+33 1 23 45 67 89"));
    assert!(kml.contains("Failed Conversions"));
    assert!(kml.contains("Error: no URL"));

    let layers = dir.path().join("out").join("layers");
    for name in ["paris_sleep.kml", "paris_sleep.kmz", "paris_do.kml", "paris_do.kmz"] {
        assert!(layers.join(name).exists(), "missing {name}");
    }
    let sleep = std::fs::read_to_string(layers.join("paris_sleep.kml")).unwrap();
    assert!(sleep.contains("Grand Hotel"));
    assert!(!sleep.contains("Eiffel Tower"));
    assert!(!sleep.contains("Failed Conversions"));

    let stats = pipeline.geocode_stats().unwrap();
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.failures, 0);
}

#[tokio::test]
async fn test_flat_kml_without_enrichment() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flat.csv");
    std::fs::write(
        &input,
        "Title,URL\nCafe X,\"https://maps.google.com/@40.7128,-74.0060,15z\"\n",
    )
    .unwrap();

    let settings = Settings {
        geocode_url: url::Url::parse(&format!("{}/reverse", server.uri())).unwrap(),
        ..Settings::default()
    };
    let options = PipelineOptions {
        geocode: false,
        layers: false,
        icons: false,
    };
    let mut pipeline = Pipeline::from_settings(&settings, options).unwrap();

    let output = dir.path().join("flat.kml");
    let report = convert_csv(&mut pipeline, &input, &output, OutputFormat::Kml)
        .await
        .unwrap();

    assert_eq!(report.placed, 1);
    assert!(report.layers.is_empty());
    assert!(!dir.path().join("layers").exists());

    let kml = std::fs::read_to_string(&output).unwrap();
    assert!(!kml.contains("<Folder>"));
    assert!(!kml.contains("<Icon>"));
    assert!(kml.contains("<coordinates>-74.006,40.7128,0</coordinates>"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
