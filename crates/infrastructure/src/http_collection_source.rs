use std::marker::PhantomData;

use async_trait::async_trait;
use eca_application::{CollectionQuery, CollectionSource};
use eca_core::AppResult;
use eca_domain::{Collection, Page, TransportMode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::eca_api_client::EcaApiClient;

/// HTTP-backed page source for one ECA collection.
pub struct HttpCollectionSource<T> {
    client: EcaApiClient,
    collection: Collection,
    record: PhantomData<fn() -> T>,
}

impl<T> HttpCollectionSource<T> {
    /// Creates a source for `collection`.
    #[must_use]
    pub fn new(client: EcaApiClient, collection: Collection) -> Self {
        Self {
            client,
            collection,
            record: PhantomData,
        }
    }

    fn page_url(&self, query: &CollectionQuery) -> AppResult<Url> {
        let mut segments = self.collection.path_segments();
        let pairs = match self.collection.transport_mode() {
            TransportMode::Query => query.query_pairs(),
            TransportMode::Search => {
                segments.push("search");
                query.control_pairs()
            }
        };
        let mut url = self.client.endpoint_segments(segments.as_slice())?;
        url.query_pairs_mut().extend_pairs(pairs);
        Ok(url)
    }
}

#[async_trait]
impl<T> CollectionSource<T> for HttpCollectionSource<T>
where
    T: DeserializeOwned + Send,
{
    async fn fetch_page(&self, query: &CollectionQuery) -> AppResult<Page<T>> {
        let url = self.page_url(query)?;
        debug!(
            collection = %self.collection.path(),
            limit = query.limit,
            offset = query.offset,
            filters = query.filters.len(),
            "fetching collection page"
        );

        match self.collection.transport_mode() {
            TransportMode::Query => self.client.get_json(url).await,
            TransportMode::Search => self.client.post_json(url, &query.search_body()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use eca_application::{CollectionFilter, CollectionQuery, CollectionSource, FilterValue};
    use eca_core::AppError;
    use eca_domain::{Collection, SortDirective};
    use mockito::Matcher;
    use serde::Deserialize;
    use serde_json::json;

    use super::HttpCollectionSource;
    use crate::eca_api_client::EcaApiClient;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct UserRow {
        signum: String,
    }

    fn client(server: &mockito::Server) -> EcaApiClient {
        match EcaApiClient::new(
            reqwest::Client::new(),
            format!("{}/api/", server.url()).as_str(),
            Some("token-1".to_owned()),
        ) {
            Ok(client) => client,
            Err(error) => panic!("client should build: {error}"),
        }
    }

    #[tokio::test]
    async fn query_mode_sends_filters_in_query_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/users")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".to_owned(), "25".to_owned()),
                Matcher::UrlEncoded("offset".to_owned(), "0".to_owned()),
                Matcher::UrlEncoded("sort".to_owned(), "asc(signum)".to_owned()),
                Matcher::UrlEncoded("isSoftDeleted".to_owned(), "false".to_owned()),
                Matcher::UrlEncoded("createdDate".to_owned(), "2024-03-15".to_owned()),
                Matcher::UrlEncoded("timeZone".to_owned(), "Europe/Stockholm".to_owned()),
            ]))
            .match_header("Authorization", "Bearer token-1")
            .with_status(200)
            .with_body(
                json!({
                    "results": [{"signum": "eanberg"}],
                    "totalRecords": 1,
                    "morePages": false
                })
                .to_string(),
            )
            .create_async()
            .await;

        let source = HttpCollectionSource::<UserRow>::new(client(&server), Collection::Users);
        let mut query = CollectionQuery::page(25, 0);
        query.sort = SortDirective::from_str("asc(signum)").ok();
        query.time_zone = Some("Europe/Stockholm".to_owned());
        query.filters = vec![
            CollectionFilter {
                key: "createdDate".to_owned(),
                value: FilterValue::One("2024-03-15".to_owned()),
            },
            CollectionFilter {
                key: "isSoftDeleted".to_owned(),
                value: FilterValue::Many(vec!["false".to_owned()]),
            },
        ];

        let page = source.fetch_page(&query).await;

        mock.assert_async().await;
        assert_eq!(
            page.map(|value| (value.results, value.total_records, value.more_pages))
                .ok(),
            Some((
                vec![UserRow {
                    signum: "eanberg".to_owned()
                }],
                1,
                Some(false)
            ))
        );
    }

    #[tokio::test]
    async fn search_mode_posts_filters_as_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/packages/PKG-9/evidences/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".to_owned(), "10".to_owned()),
                Matcher::UrlEncoded("offset".to_owned(), "20".to_owned()),
            ]))
            .match_body(Matcher::Json(json!({
                "status": ["Pending", "Ready"],
                "name": "tower"
            })))
            .with_status(200)
            .with_body(json!({"results": [], "totalRecords": 0}).to_string())
            .create_async()
            .await;

        let Ok(collection) = Collection::parse("evidences", Some("PKG-9")) else {
            panic!("evidences collection should parse");
        };
        let source = HttpCollectionSource::<UserRow>::new(client(&server), collection);
        let mut query = CollectionQuery::page(10, 20);
        query.filters = vec![
            CollectionFilter {
                key: "name".to_owned(),
                value: FilterValue::One("tower".to_owned()),
            },
            CollectionFilter {
                key: "status".to_owned(),
                value: FilterValue::Many(vec!["Pending".to_owned(), "Ready".to_owned()]),
            },
        ];

        let page = source.fetch_page(&query).await;

        mock.assert_async().await;
        assert_eq!(page.map(|value| value.total_records).ok(), Some(0));
    }

    #[test]
    fn page_url_encodes_reserved_characters_in_package_id() {
        let Ok(client) = EcaApiClient::new(reqwest::Client::new(), "http://127.0.0.1:8080/api", None)
        else {
            panic!("client should build");
        };
        let page_url = |package_id: &str| {
            let Ok(collection) = Collection::parse("evidences", Some(package_id)) else {
                panic!("evidences collection should parse");
            };
            HttpCollectionSource::<UserRow>::new(client.clone(), collection)
                .page_url(&CollectionQuery::page(10, 0))
                .map(|url| url.to_string())
                .ok()
        };

        assert_eq!(
            page_url("PKG#7"),
            Some("http://127.0.0.1:8080/api/packages/PKG%237/evidences/search?limit=10&offset=0".to_owned())
        );
        assert_eq!(
            page_url("PKG?x=1"),
            Some("http://127.0.0.1:8080/api/packages/PKG%3Fx=1/evidences/search?limit=10&offset=0".to_owned())
        );
        assert_eq!(
            page_url("../admin"),
            Some("http://127.0.0.1:8080/api/packages/..%2Fadmin/evidences/search?limit=10&offset=0".to_owned())
        );
    }

    #[tokio::test]
    async fn package_member_list_reaches_encoded_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/packages/PKG%237/users")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": [{"signum": "eanberg"}], "totalRecords": 1}).to_string())
            .create_async()
            .await;

        let Ok(collection) = Collection::package_members("PKG#7") else {
            panic!("package members collection should build");
        };
        let source = HttpCollectionSource::<UserRow>::new(client(&server), collection);
        let page = source.fetch_page(&CollectionQuery::page(100, 0)).await;

        mock.assert_async().await;
        assert_eq!(page.map(|value| value.total_records).ok(), Some(1));
    }

    #[tokio::test]
    async fn server_error_is_transient_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/customers")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let source = HttpCollectionSource::<UserRow>::new(client(&server), Collection::Customers);
        let result = source.fetch_page(&CollectionQuery::page(25, 0)).await;

        assert_eq!(
            result.as_ref().err(),
            Some(&AppError::Upstream {
                status: 502,
                message: "bad gateway".to_owned(),
            })
        );
        assert!(result.err().is_some_and(|error| error.is_transient()));
    }
}
