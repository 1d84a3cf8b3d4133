use crate::dataset_controller::state::DatasetCache;
use actix_web::{web, HttpResponse, Responder};
use log::warn;

pub(crate) async fn process(path: web::Path<String>, cache: web::Data<DatasetCache>) -> impl Responder {
    let path = path.into_inner();

    let Some(file) = cache.resolve(&path) else {
        warn!("Refused dataset path {:?}", path);
        return HttpResponse::BadRequest().body("Invalid dataset path");
    };
    if !file.is_file() {
        return HttpResponse::NotFound().body("Dataset not found");
    }

    match cache.load(&path).await {
        Ok(payload) => HttpResponse::Ok().json(payload.as_ref()),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error loading dataset: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use crate::dataset_controller::state::DatasetCache;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    #[actix_web::test]
    async fn test_dataset_is_served_as_json() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("srd")).unwrap();
        fs::write(
            dir.path().join("srd/conditions.json"),
            r#"[{"index": "blinded", "name": "Blinded"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "not json").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DatasetCache::new(dir.path())))
                .service(crate::services::datasets::configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/data/srd/conditions.json").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([{"index": "blinded", "name": "Blinded"}]));

        let req = test::TestRequest::get().uri("/data/missing.json").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/data/broken.json").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let req = test::TestRequest::get().uri("/data/srd/../../secret.json").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
