//! Post-processing stages over a freshly harvested dataset

use crate::common::{
    category_page, coordinator, create_test_config, listing_page, product_page, CATEGORY_PATH,
    SUBCATEGORY_PATH,
};
use aqua_harvest::postprocess::{clean_descriptions, convert_units, publish, retrieve_images};
use aqua_harvest::storage::{read_collection, SqliteExporter};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_harvest_then_postprocess() {
    let server = MockServer::start().await;
    mount(
        &server,
        CATEGORY_PATH,
        ResponseTemplate::new(200).set_body_string(category_page(&[(
            "/category/16/angelfish?c=15+16",
            "Angelfish",
        )])),
    )
    .await;
    mount(
        &server,
        SUBCATEGORY_PATH,
        ResponseTemplate::new(200).set_body_string(listing_page(
            &["/product/101/flame-angelfish", "/product/102/coral-beauty"],
            None,
        )),
    )
    .await;
    mount(
        &server,
        "/product/101/flame-angelfish",
        ResponseTemplate::new(200).set_body_string(product_page("101", "Flame Angelfish", "Up to 4\"")),
    )
    .await;
    mount(
        &server,
        "/product/102/coral-beauty",
        ResponseTemplate::new(200).set_body_string(product_page("102", "Coral Beauty", "3½\"")),
    )
    .await;
    mount(
        &server,
        "/images/categories/product/p-101.jpg",
        ResponseTemplate::new(200).set_body_raw(vec![0xFFu8; 4096], "image/jpeg"),
    )
    .await;
    mount(&server, "/images/categories/product/p-102.jpg", ResponseTemplate::new(404)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    coordinator(config.clone()).run().await.unwrap();

    assert_eq!(convert_units(&config).unwrap(), 2);
    assert_eq!(clean_descriptions(&config).unwrap(), 2);

    let images = retrieve_images(&config).await.unwrap();
    assert_eq!(images.downloaded, 1);
    assert_eq!(images.failed, 1);

    let records = read_collection(&config.output.data_dir().join("marine-fish.json")).unwrap();
    assert_eq!(records[0].max_size, "Maks. 10,2 cm");
    assert_eq!(records[1].max_size, "8,9 cm");
    assert_eq!(records[0].min_tank_size, "265 L");
    assert_eq!(records[0].water_params.temperature, "22,2-25,6°C");
    assert_eq!(
        records[0].description,
        "The Flame Angelfish is a colorful reef visitor."
    );
    assert_eq!(records[0].image_url, "/images/marine-fish/101.jpg");
    assert!(records[1].image_url.starts_with("http"));

    let summary = publish(&config).unwrap();
    assert_eq!(summary.images_copied, 1);
    let public = Path::new(&config.postprocess.publish_dir);
    assert!(public.join("data/marine-fish.json").is_file());
    assert!(public.join("data/categories.json").is_file());
    assert!(public.join("images/marine-fish/101.jpg").is_file());

    let mut exporter = SqliteExporter::open(Path::new(&config.output.sqlite_path)).unwrap();
    let exported = exporter.export(&records, "marine-fish").unwrap();
    assert_eq!(exported.inserted, 2);
    let again = exporter.export(&records, "marine-fish").unwrap();
    assert_eq!(again.skipped, 2);
    assert_eq!(exporter.count().unwrap(), 2);
}
