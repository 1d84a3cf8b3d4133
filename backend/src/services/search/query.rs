use crate::dataset_controller::state::DatasetCache;
use actix_web::{web, HttpResponse, Responder};
use common::requests::{SearchQuery, SearchResponse};
use common::search::SearchIndex;
use log::info;

pub(crate) async fn process(
    query: web::Query<SearchQuery>,
    index: web::Data<SearchIndex>,
    cache: web::Data<DatasetCache>,
) -> impl Responder {
    if query.q.trim().is_empty() {
        return HttpResponse::BadRequest().body("Query must not be empty");
    }

    let results = index
        .query(&query.q, |source| {
            let cache = cache.clone();
            let path = source.path.clone();
            async move { cache.load(&path).await.map(|payload| payload.as_ref().clone()) }
        })
        .await;

    let response = SearchResponse::from(results);
    info!(
        "Search {:?}: {} candidates, {} failed sources",
        query.q,
        response.candidates.len(),
        response.errors.len()
    );
    HttpResponse::Ok().json(response)
}
