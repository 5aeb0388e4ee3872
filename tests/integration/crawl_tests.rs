//! End-to-end harvest tests against a mock catalog

use crate::common::{
    category_page, coordinator, create_test_config, listing_page, product_page, CATEGORY_PATH,
    SUBCATEGORY_PATH,
};
use aqua_harvest::crawler::InterruptFlag;
use aqua_harvest::output::RunStatus;
use aqua_harvest::storage::{read_collection, write_collection, CategoryIndexEntry};
use aqua_harvest::SpeciesRecord;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

async fn mount_html(server: &MockServer, at: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Category page with one real subcategory and one collection page
async fn mount_category(server: &MockServer) {
    mount_html(
        server,
        CATEGORY_PATH,
        category_page(&[
            ("/category/16/angelfish?c=15+16&r=xyz", "Angelfish"),
            ("/category/18/nano-packs?c=15+18", "Nano Fish Value Pack"),
        ]),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/category/18/nano-packs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

/// Serves a product page and requests a stop while doing so
struct InterruptingResponder {
    flag: InterruptFlag,
    body: String,
}

impl Respond for InterruptingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.flag.trigger();
        ResponseTemplate::new(200)
            .set_body_string(self.body.clone())
            .insert_header("content-type", "text/html")
    }
}

async fn mount_interrupting(server: &MockServer, at: &str, flag: InterruptFlag, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(InterruptingResponder { flag, body })
        .expect(1)
        .mount(server)
        .await;
}

fn load_records(config: &aqua_harvest::Config) -> Vec<SpeciesRecord> {
    read_collection(&config.output.data_dir().join("marine-fish.json")).unwrap()
}

#[tokio::test]
async fn test_full_harvest_single_category() {
    let server = MockServer::start().await;
    mount_category(&server).await;
    mount_html(
        &server,
        SUBCATEGORY_PATH,
        listing_page(
            &["/product/101/flame-angelfish", "/product/102/coral-beauty"],
            None,
        ),
        1,
    )
    .await;
    mount_html(
        &server,
        "/product/101/flame-angelfish",
        product_page("101", "Flame Angelfish", "4\""),
        1,
    )
    .await;
    mount_html(
        &server,
        "/product/102/coral-beauty",
        product_page("102", "Coral Beauty", "4\""),
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let stats = coordinator(config.clone()).run().await.expect("Harvest failed");

    assert_eq!(stats.status, RunStatus::Completed);
    assert_eq!(stats.records_added(), 2);
    assert_eq!(stats.categories[0].subcategories_visited, 1);
    assert!(!stats.categories[0].used_fallback);

    let records = load_records(&config);
    assert_eq!(records.len(), 2);

    let flame = &records[0];
    assert_eq!(flame.id, "101");
    assert_eq!(flame.name, "Flame Angelfish");
    assert_eq!(flame.subcategory, "Angelfish");
    assert_eq!(flame.care_level_tr, "Orta");
    assert_eq!(flame.water_params.ph, "8.1-8.4");
    assert!(flame.image_url.ends_with("/images/categories/product/p-101.jpg"));
    // the species name survives translation untouched
    assert!(flame
        .description_tr
        .starts_with("TR: The Flame Angelfish is a colorful reef visitor."));

    let index: Vec<CategoryIndexEntry> = serde_json::from_str(
        &std::fs::read_to_string(config.output.index_path()).unwrap(),
    )
    .unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index[0].species_count, 2);
    assert_eq!(index[0].subcategories, vec!["Angelfish".to_string()]);

    let report = std::fs::read_to_string(&config.output.report_path).unwrap();
    assert!(report.contains("| marine-fish |"));
}

#[tokio::test]
async fn test_resume_skips_saved_products() {
    let server = MockServer::start().await;
    mount_category(&server).await;
    mount_html(
        &server,
        SUBCATEGORY_PATH,
        listing_page(
            &["/product/101/flame-angelfish", "/product/102/coral-beauty"],
            None,
        ),
        1,
    )
    .await;
    mount_html(
        &server,
        "/product/101/flame-angelfish",
        product_page("101", "Flame Angelfish", "4\""),
        0,
    )
    .await;
    mount_html(
        &server,
        "/product/102/coral-beauty",
        product_page("102", "Coral Beauty", "4\""),
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    write_collection(
        &config.output.data_dir().join("marine-fish.json"),
        &[SpeciesRecord {
            id: "101".to_string(),
            name: "Flame Angelfish".to_string(),
            name_tr: "Flame Angelfish".to_string(),
            category: "marine-fish".to_string(),
            subcategory: "Angelfish".to_string(),
            ..SpeciesRecord::default()
        }],
    )
    .unwrap();

    let stats = coordinator(config.clone()).run().await.unwrap();

    assert_eq!(stats.categories[0].records_before, 1);
    assert_eq!(stats.categories[0].new_urls, 1);
    assert_eq!(stats.records_added(), 1);

    let ids: Vec<String> = load_records(&config).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["101".to_string(), "102".to_string()]);
}

#[tokio::test]
async fn test_failed_product_is_fetched_on_next_run() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        CATEGORY_PATH,
        category_page(&[("/category/16/angelfish?c=15+16", "Angelfish")]),
        2,
    )
    .await;
    mount_html(
        &server,
        SUBCATEGORY_PATH,
        listing_page(
            &["/product/101/flame-angelfish", "/product/102/coral-beauty"],
            None,
        ),
        2,
    )
    .await;
    mount_html(
        &server,
        "/product/101/flame-angelfish",
        product_page("101", "Flame Angelfish", "4\""),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/product/102/coral-beauty"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/product/102/coral-beauty",
        product_page("102", "Coral Beauty", "4\""),
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let first = coordinator(config.clone()).run().await.unwrap();
    assert_eq!(first.records_added(), 1);
    assert_eq!(first.fetch_failures(), 1);
    assert_eq!(load_records(&config).len(), 1);

    let second = coordinator(config.clone()).run().await.unwrap();
    assert_eq!(second.records_added(), 1);
    assert_eq!(second.fetch_failures(), 0);
    assert_eq!(load_records(&config).len(), 2);
}

#[tokio::test]
async fn test_pagination_stops_when_page_adds_nothing_new() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        CATEGORY_PATH,
        category_page(&[("/category/16/angelfish?c=15+16", "Angelfish")]),
        1,
    )
    .await;

    // specific pages first, the unqualified first page last
    Mock::given(method("GET"))
        .and(path(SUBCATEGORY_PATH))
        .and(query_param("page_num", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &["/product/102/coral-beauty", "/product/103/lemonpeel-angelfish"],
            Some(3),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SUBCATEGORY_PATH))
        .and(query_param("page_num", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &["/product/101/flame-angelfish", "/product/103/lemonpeel-angelfish"],
            Some(4),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SUBCATEGORY_PATH))
        .and(query_param("page_num", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &["/product/104/regal-angelfish"],
            None,
        )))
        .expect(0)
        .mount(&server)
        .await;
    mount_html(
        &server,
        SUBCATEGORY_PATH,
        listing_page(
            &["/product/101/flame-angelfish", "/product/102/coral-beauty"],
            Some(2),
        ),
        1,
    )
    .await;

    for (id, slug, name) in [
        ("101", "flame-angelfish", "Flame Angelfish"),
        ("102", "coral-beauty", "Coral Beauty"),
        ("103", "lemonpeel-angelfish", "Lemonpeel Angelfish"),
    ] {
        mount_html(
            &server,
            &format!("/product/{}/{}", id, slug),
            product_page(id, name, "5\""),
            1,
        )
        .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let stats = coordinator(config.clone()).run().await.unwrap();

    assert_eq!(stats.categories[0].urls_listed, 3);
    assert_eq!(stats.records_added(), 3);
}

#[tokio::test]
async fn test_category_without_subcategories_is_listed_itself() {
    let server = MockServer::start().await;
    // discovery and the first listing page both load the category page
    mount_html(
        &server,
        CATEGORY_PATH,
        listing_page(&["/product/201/yellow-tang"], None),
        2,
    )
    .await;
    mount_html(
        &server,
        "/product/201/yellow-tang",
        product_page("201", "Yellow Tang", "8\""),
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let stats = coordinator(config.clone()).run().await.unwrap();

    assert!(stats.categories[0].used_fallback);
    let records = load_records(&config);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].subcategory, "Marine Fish");
}

#[tokio::test]
async fn test_interrupted_run_still_writes_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    write_collection(
        &config.output.data_dir().join("marine-fish.json"),
        &[SpeciesRecord {
            id: "101".to_string(),
            name: "Flame Angelfish".to_string(),
            subcategory: "Angelfish".to_string(),
            ..SpeciesRecord::default()
        }],
    )
    .unwrap();

    let mut coordinator = coordinator(config.clone());
    coordinator.interrupt_flag().trigger();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.status, RunStatus::Interrupted);
    assert!(stats.categories.is_empty());

    let index: Vec<CategoryIndexEntry> = serde_json::from_str(
        &std::fs::read_to_string(config.output.index_path()).unwrap(),
    )
    .unwrap();
    assert_eq!(index[0].species_count, 1);
}

#[tokio::test]
async fn test_interrupt_mid_subcategory_persists_fetched_records() {
    let server = MockServer::start().await;
    mount_category(&server).await;
    mount_html(
        &server,
        SUBCATEGORY_PATH,
        listing_page(
            &[
                "/product/301/regal-angelfish",
                "/product/302/lemonpeel-angelfish",
                "/product/303/bicolor-angelfish",
            ],
            None,
        ),
        1,
    )
    .await;
    mount_html(&server, "/product/302/lemonpeel-angelfish", String::new(), 0).await;
    mount_html(&server, "/product/303/bicolor-angelfish", String::new(), 0).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let mut coordinator = coordinator(config.clone());
    mount_interrupting(
        &server,
        "/product/301/regal-angelfish",
        coordinator.interrupt_flag(),
        product_page("301", "Regal Angelfish", "10\""),
    )
    .await;

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.status, RunStatus::Interrupted);
    assert_eq!(stats.records_added(), 1);

    let records = load_records(&config);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "301");
    assert!(config.output.index_path().exists());
    assert!(std::path::Path::new(&config.output.report_path).exists());
}

#[tokio::test]
async fn test_interrupt_after_subcategory_skips_the_next_one() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        CATEGORY_PATH,
        category_page(&[
            ("/category/16/angelfish?c=15+16", "Angelfish"),
            ("/category/17/tangs?c=15+17", "Tangs"),
        ]),
        1,
    )
    .await;
    mount_html(
        &server,
        SUBCATEGORY_PATH,
        listing_page(&["/product/311/flame-angelfish"], None),
        1,
    )
    .await;
    mount_html(&server, "/category/17/tangs", String::new(), 0).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let mut coordinator = coordinator(config.clone());
    mount_interrupting(
        &server,
        "/product/311/flame-angelfish",
        coordinator.interrupt_flag(),
        product_page("311", "Flame Angelfish", "4\""),
    )
    .await;

    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.status, RunStatus::Interrupted);
    assert_eq!(stats.categories[0].subcategories_visited, 1);
    assert_eq!(load_records(&config).len(), 1);
}

#[tokio::test]
async fn test_corrupt_collection_still_writes_index_and_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    std::fs::create_dir_all(config.output.data_dir()).unwrap();
    std::fs::write(config.output.data_dir().join("marine-fish.json"), "{not json").unwrap();

    let stats = coordinator(config.clone()).run().await.unwrap();

    assert_eq!(stats.status, RunStatus::Completed);
    assert_eq!(stats.records_added(), 0);

    let index: Vec<CategoryIndexEntry> = serde_json::from_str(
        &std::fs::read_to_string(config.output.index_path()).unwrap(),
    )
    .unwrap();
    assert_eq!(index[0].slug, "marine-fish");
    assert_eq!(index[0].species_count, 0);
    assert!(std::path::Path::new(&config.output.report_path).exists());
    assert_eq!(
        std::fs::read_to_string(config.output.data_dir().join("marine-fish.json")).unwrap(),
        "{not json"
    );
}
